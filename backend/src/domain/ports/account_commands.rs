//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to register, log in and out, and to
//! resolve the actor behind a stored session, without importing any
//! persistence or hashing infrastructure.

use async_trait::async_trait;

use crate::domain::{
    Error, LoginCredentials, RegistrationForm, Session, SessionGrant, User, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommands: Send + Sync {
    /// Create a public account.
    async fn register(&self, form: RegistrationForm) -> Result<UserId, Error>;

    /// Verify credentials and issue a session grant.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Session, Error>;

    /// End a session. Every grant issued to the user up to now stops
    /// resolving, so copies of the session cookie are useless afterwards.
    /// Never fails; `None` means nobody was logged in.
    async fn logout(&self, user_id: Option<UserId>);

    /// Load the user behind a live grant. `Ok(None)` when the user no longer
    /// exists or logged out after the grant was issued.
    async fn resolve_grant(&self, grant: &SessionGrant) -> Result<Option<User>, Error>;

    /// Load the current state of a session's user. `Ok(None)` when the user
    /// no longer exists.
    async fn resolve_user(&self, user_id: &UserId) -> Result<Option<User>, Error>;
}
