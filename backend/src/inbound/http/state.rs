//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::SessionPolicy;
use crate::domain::ports::{
    AccountCommands, AdminCommands, ContentCommands, ContentQueries, DirectorySearch,
};

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommands>,
    pub content: Arc<dyn ContentCommands>,
    pub content_queries: Arc<dyn ContentQueries>,
    pub admin: Arc<dyn AdminCommands>,
    pub search: Arc<dyn DirectorySearch>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommands>,
    pub content: Arc<dyn ContentCommands>,
    pub content_queries: Arc<dyn ContentQueries>,
    pub admin: Arc<dyn AdminCommands>,
    pub search: Arc<dyn DirectorySearch>,
    /// Lifetimes applied to stored session grants.
    pub session_policy: SessionPolicy,
    /// Time source for session expiry checks.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state with the default session policy and system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            content,
            content_queries,
            admin,
            search,
        } = ports;
        Self {
            accounts,
            content,
            content_queries,
            admin,
            search,
            session_policy: SessionPolicy::default(),
            clock: Arc::new(DefaultClock),
        }
    }

    #[must_use]
    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    /// Replace the clock, typically with a controllable test double.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
