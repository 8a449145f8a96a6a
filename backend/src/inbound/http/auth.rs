//! Actor resolution used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! session expiry and identity lookup here. Roles are reloaded on every
//! request so a role change applies immediately.

use tracing::info;

use crate::domain::{Actor, Error, User};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Message returned when an endpoint needs a logged-in user.
pub const LOGIN_REQUIRED: &str = "login required";

/// Resolve the session's user, or `None` for anonymous visitors.
///
/// Expired grants, grants revoked by a logout and grants naming a deleted
/// user purge the session.
pub async fn current_user(state: &HttpState, session: &SessionContext) -> ApiResult<Option<User>> {
    let Some(grant) = session.active_grant(&state.session_policy, state.clock.utc())? else {
        return Ok(None);
    };
    let user = state.accounts.resolve_grant(&grant).await?;
    if user.is_none() {
        info!(user_id = %grant.user_id, "session grant no longer resolves; purging");
        session.purge();
    }
    Ok(user)
}

/// Resolve the session's user, rejecting anonymous visitors with 401.
pub async fn require_user(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    current_user(state, session)
        .await?
        .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))
}

/// Resolve the session's actor, rejecting anonymous visitors with 401.
pub async fn require_actor(state: &HttpState, session: &SessionContext) -> ApiResult<Actor> {
    require_user(state, session).await.map(|user| Actor::from(&user))
}
