//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read and purge a
//! [`SessionGrant`]. Expiry decisions are delegated to [`SessionPolicy`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Error, SessionGrant, SessionPolicy, SessionState, UserId};

pub(crate) const GRANT_KEY: &str = "grant";

/// Cookie representation of a [`SessionGrant`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGrant {
    user_id: UserId,
    issued_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    remember_me: bool,
}

impl From<&SessionGrant> for StoredGrant {
    fn from(grant: &SessionGrant) -> Self {
        Self {
            user_id: grant.user_id,
            issued_at: grant.issued_at,
            last_seen: grant.last_seen,
            remember_me: grant.remember_me,
        }
    }
}

impl From<StoredGrant> for SessionGrant {
    fn from(stored: StoredGrant) -> Self {
        Self {
            user_id: stored.user_id,
            issued_at: stored.issued_at,
            last_seen: stored.last_seen,
            remember_me: stored.remember_me,
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store a fresh grant, rotating the session to prevent fixation.
    pub fn persist_grant(&self, grant: &SessionGrant) -> Result<(), Error> {
        self.0.renew();
        self.store(grant)
    }

    fn store(&self, grant: &SessionGrant) -> Result<(), Error> {
        self.0
            .insert(GRANT_KEY, StoredGrant::from(grant))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the stored grant without checking expiry. A grant that fails to
    /// decode is treated as absent.
    fn grant(&self) -> Option<SessionGrant> {
        match self.0.get::<StoredGrant>(GRANT_KEY) {
            Ok(stored) => stored.map(SessionGrant::from),
            Err(error) => {
                warn!(%error, "unreadable session grant; treating request as anonymous");
                self.purge();
                None
            }
        }
    }

    /// Return the grant if `policy` still accepts it at `now`, refreshing its
    /// `last_seen`. Expired grants are purged.
    pub fn active_grant(
        &self,
        policy: &SessionPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionGrant>, Error> {
        let Some(grant) = self.grant() else {
            return Ok(None);
        };
        match policy.evaluate(&grant, now) {
            SessionState::Active => {
                let refreshed = grant.touched(now);
                self.store(&refreshed)?;
                Ok(Some(refreshed))
            }
            state => {
                debug!(?state, user_id = %grant.user_id, "session expired");
                self.purge();
                Ok(None)
            }
        }
    }

    /// Drop all session state. Safe to call on an empty session.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
