//! Password hashing capability.
use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    pub enum PasswordHashError {
        /// Hashing failed, usually from invalid parameters.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted, irreversible password hashing.
///
/// Synchronous because implementations are CPU-bound; callers on the async
/// runtime accept the cost per login and registration.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
