//! Credential primitives: login input, registration forms and the password
//! complexity policy.
//!
//! These types validate raw strings before any port is touched, so the rules
//! can be exercised without storage.

use std::fmt;

use serde_json::json;
use zeroize::Zeroizing;

use super::user::{UserValidationError, Username};
use super::Error;

/// Salted one-way password hash in PHC string format.
///
/// The inner value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a password hasher.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string suitable for storage and verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use menu_directory::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "Abc12345!", true).unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert!(creds.remember_me());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
    remember_me: bool,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            remember_me,
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the caller asked for an extended session.
    pub fn remember_me(&self) -> bool {
        self.remember_me
    }
}

/// Individual password complexity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    UpperCase,
    LowerCase,
    Digit,
    Symbol,
}

impl PasswordRule {
    /// Stable identifier reported in error details.
    pub const fn code(self) -> &'static str {
        match self {
            Self::MinLength => "min_length",
            Self::UpperCase => "upper_case",
            Self::LowerCase => "lower_case",
            Self::Digit => "digit",
            Self::Symbol => "symbol",
        }
    }
}

/// Password complexity policy.
///
/// A password passes when it has at least `min_length` characters and
/// contains an upper-case letter, a lower-case letter, a digit and a
/// non-alphanumeric character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Return every rule the password fails, in declaration order.
    pub fn violations(&self, password: &str) -> Vec<PasswordRule> {
        let mut failed = Vec::new();
        if password.chars().count() < self.min_length {
            failed.push(PasswordRule::MinLength);
        }
        if !password.chars().any(char::is_uppercase) {
            failed.push(PasswordRule::UpperCase);
        }
        if !password.chars().any(char::is_lowercase) {
            failed.push(PasswordRule::LowerCase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            failed.push(PasswordRule::Digit);
        }
        if password.chars().all(char::is_alphanumeric) {
            failed.push(PasswordRule::Symbol);
        }
        failed
    }
}

/// Failures raised while registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("username is invalid: {0}")]
    InvalidUsername(UserValidationError),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password does not meet the complexity policy")]
    WeakPassword { failed: Vec<PasswordRule> },
    #[error("username is already taken")]
    UsernameTaken,
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::InvalidUsername(reason) => Error::invalid_request(format!(
                "Username is invalid: {reason}"
            ))
            .with_details(json!({ "field": "username", "code": "invalid_username" })),
            RegistrationError::PasswordMismatch => Error::invalid_request("Passwords must match")
                .with_details(json!({ "field": "confirmPassword", "code": "password_mismatch" })),
            RegistrationError::WeakPassword { failed } => Error::invalid_request(
                "Password must be at least 8 characters and include upper-case, lower-case, \
                 digit and symbol characters",
            )
            .with_details(json!({
                "field": "password",
                "code": "weak_password",
                "failedRules": failed.iter().map(|rule| rule.code()).collect::<Vec<_>>(),
            })),
            RegistrationError::UsernameTaken => Error::conflict("Username is already taken")
                .with_details(json!({ "field": "username", "code": "username_taken" })),
        }
    }
}

/// Raw registration input.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub username: String,
    pub password: Zeroizing<String>,
    pub confirm_password: Zeroizing<String>,
}

/// Registration input that passed every storage-independent check.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub username: Username,
    pub password: Zeroizing<String>,
}

impl RegistrationForm {
    /// Build a form from borrowed strings.
    pub fn new(username: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            confirm_password: Zeroizing::new(confirm_password.to_owned()),
        }
    }

    /// Check the username, the confirmation and the password policy, in that
    /// order. Uniqueness is checked later against storage.
    pub fn validate(
        self,
        policy: &PasswordPolicy,
    ) -> Result<ValidatedRegistration, RegistrationError> {
        let username = Username::new(&self.username).map_err(RegistrationError::InvalidUsername)?;
        if self.password.as_str() != self.confirm_password.as_str() {
            return Err(RegistrationError::PasswordMismatch);
        }
        let failed = policy.violations(&self.password);
        if !failed.is_empty() {
            return Err(RegistrationError::WeakPassword { failed });
        }
        Ok(ValidatedRegistration {
            username,
            password: self.password,
        })
    }
}
