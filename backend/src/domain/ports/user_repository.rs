//! Port abstraction for user account persistence and its errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Role, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username unique constraint rejected the insert.
        DuplicateUsername => "username already exists",
    }
}

/// Driven port over stored user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Returns [`UserPersistenceError::DuplicateUsername`] when the username
    /// is already present, including when a concurrent insert wins the race.
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account, including its password hash, by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// All users ordered by username.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite a user's role. Returns `false` when the user does not exist.
    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError>;

    /// Invalidate every session grant issued to `id` at or before `at`.
    /// Returns `false` when the user does not exist.
    async fn revoke_sessions(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;

    /// Latest revocation recorded by [`UserRepository::revoke_sessions`].
    async fn sessions_revoked_at(
        &self,
        id: &UserId,
    ) -> Result<Option<DateTime<Utc>>, UserPersistenceError>;

    /// Move every restaurant owned by `id` to `fallback_owner`, then delete
    /// the user, atomically. Ratings authored by the user are removed with it.
    ///
    /// Returns the number of restaurants reassigned, or `None` when the user
    /// does not exist.
    async fn delete_reassigning(
        &self,
        id: &UserId,
        fallback_owner: &UserId,
    ) -> Result<Option<usize>, UserPersistenceError>;
}
