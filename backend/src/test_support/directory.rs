//! In-memory service wiring for behaviour and HTTP tests.
//!
//! [`DirectoryHarness`] builds every domain service over one shared
//! [`InMemoryDirectory`] with a low-cost Argon2 hasher and a
//! [`MutableClock`], and bootstraps the root administrator.

use std::sync::Arc;

use crate::domain::{
    AccountService, AdminService, Auditor, ContentService, CurrencySymbol, DirectoryRepositories,
    Error, SearchService, UserId,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryDirectory;
use crate::outbound::security::Argon2PasswordHasher;

use super::MutableClock;

pub const ROOT_ADMIN_USERNAME: &str = "root";
pub const ROOT_ADMIN_PASSWORD: &str = "Root1234!";

/// Fully wired services sharing one in-memory store.
#[derive(Clone)]
pub struct DirectoryHarness {
    pub directory: InMemoryDirectory,
    pub clock: Arc<MutableClock>,
    pub accounts: Arc<AccountService>,
    pub content: Arc<ContentService>,
    pub admin: Arc<AdminService>,
    pub search: Arc<SearchService>,
    pub root_admin: UserId,
}

impl DirectoryHarness {
    /// Wire the services and create the root administrator.
    pub async fn start() -> Result<Self, Error> {
        let directory = InMemoryDirectory::new();
        let clock = Arc::new(MutableClock::fixed());
        let hasher = Argon2PasswordHasher::low_cost()
            .map_err(|err| Error::internal(format!("test hasher: {err}")))?;
        let auditor = Auditor::new(Arc::new(directory.clone()), clock.clone());
        let repos = DirectoryRepositories {
            users: Arc::new(directory.clone()),
            restaurants: Arc::new(directory.clone()),
            menu_items: Arc::new(directory.clone()),
            ratings: Arc::new(directory.clone()),
        };

        let accounts = Arc::new(AccountService::new(
            repos.users.clone(),
            Arc::new(hasher),
            auditor.clone(),
        ));
        let root_admin = accounts
            .ensure_root_admin(ROOT_ADMIN_USERNAME, ROOT_ADMIN_PASSWORD)
            .await?;
        let content = Arc::new(ContentService::new(
            repos.clone(),
            auditor.clone(),
            CurrencySymbol::default(),
        ));
        let search = Arc::new(SearchService::new(
            repos.restaurants.clone(),
            repos.menu_items.clone(),
        ));
        let admin = Arc::new(AdminService::new(repos, auditor, root_admin));

        Ok(Self {
            directory,
            clock,
            accounts,
            content,
            admin,
            search,
            root_admin,
        })
    }

    /// Driving ports for the HTTP adapter.
    pub fn http_ports(&self) -> HttpStatePorts {
        HttpStatePorts {
            accounts: self.accounts.clone(),
            content: self.content.clone(),
            content_queries: self.content.clone(),
            admin: self.admin.clone(),
            search: self.search.clone(),
        }
    }

    /// HTTP state whose session checks follow the harness clock.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(self.http_ports()).with_clock(self.clock.clone())
    }
}
