//! Session lifetime rules.
//!
//! A [`SessionGrant`] is issued at login and stored by the transport. The
//! [`SessionPolicy`] decides whether it is still usable for a given instant.

use chrono::{DateTime, Duration, Utc};

use super::user::{User, UserId};

/// Idle and absolute expiry limits for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub idle_timeout: Duration,
    pub absolute_lifetime: Duration,
    pub remember_me_lifetime: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(30),
            absolute_lifetime: Duration::hours(12),
            remember_me_lifetime: Duration::days(30),
        }
    }
}

/// Whether a stored grant is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    IdleExpired,
    LifetimeExpired,
}

impl SessionPolicy {
    /// Evaluate `grant` at `now`.
    ///
    /// Remember-me grants only honour their own lifetime; ordinary grants
    /// expire after the idle timeout or the absolute lifetime, whichever
    /// comes first.
    pub fn evaluate(&self, grant: &SessionGrant, now: DateTime<Utc>) -> SessionState {
        let lifetime = if grant.remember_me {
            self.remember_me_lifetime
        } else {
            self.absolute_lifetime
        };
        if now - grant.issued_at >= lifetime {
            return SessionState::LifetimeExpired;
        }
        if !grant.remember_me && now - grant.last_seen >= self.idle_timeout {
            return SessionState::IdleExpired;
        }
        SessionState::Active
    }
}

/// Proof of a successful login, persisted in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGrant {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub remember_me: bool,
}

impl SessionGrant {
    pub fn issue(user_id: UserId, now: DateTime<Utc>, remember_me: bool) -> Self {
        Self {
            user_id,
            issued_at: now,
            last_seen: now,
            remember_me,
        }
    }

    /// Copy of the grant marked as used at `now`.
    #[must_use]
    pub fn touched(mut self, now: DateTime<Utc>) -> Self {
        self.last_seen = now;
        self
    }
}

/// Authenticated session returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub grant: SessionGrant,
}
