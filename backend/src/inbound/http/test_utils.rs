//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::domain::ports::{
    MockAccountCommands, MockAdminCommands, MockContentCommands, MockContentQueries,
    MockDirectorySearch,
};
use crate::domain::{Error, Role, SessionGrant, User, UserId, Username};

use super::ApiResult;
use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts};

/// Path of the route registered by [`grant_route`].
pub const GRANT_PATH: &str = "/test/grant/{user_id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommands,
    pub content: MockContentCommands,
    pub content_queries: MockContentQueries,
    pub admin: MockAdminCommands,
    pub search: MockDirectorySearch,
}

impl MockPorts {
    /// Expect session lookups to resolve to `user`.
    pub fn resolving(user: &User) -> Self {
        let mut ports = Self::default();
        let user = user.clone();
        ports
            .accounts
            .expect_resolve_grant()
            .returning(move |_| Ok(Some(user.clone())));
        ports
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            content: Arc::new(self.content),
            content_queries: Arc::new(self.content_queries),
            admin: Arc::new(self.admin),
            search: Arc::new(self.search),
        }))
    }
}

pub fn user(name: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("fixture username"),
        role,
    )
}

async fn persist_grant(session: SessionContext, user_id: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = UserId::new(user_id.as_str()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_grant(&SessionGrant::issue(id, Utc::now(), false))?;
    Ok(HttpResponse::Ok().finish())
}

/// Route that logs the session in as the user named in the path, bypassing
/// credential checks.
pub fn grant_route() -> actix_web::Route {
    web::post().to(persist_grant)
}

pub fn grant_uri(user: &User) -> String {
    GRANT_PATH.replace("{user_id}", &user.id().to_string())
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}
