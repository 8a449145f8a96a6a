//! Builders selecting storage adapters and wiring the domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use menu_directory::domain::ports::{AuditLog, PasswordHasher};
use menu_directory::domain::{
    AccountService, AdminService, Auditor, ContentService, DirectoryRepositories, Error,
    SearchService,
};
use menu_directory::inbound::http::state::{HttpState, HttpStatePorts};
use menu_directory::outbound::memory::InMemoryDirectory;
use menu_directory::outbound::persistence::{
    DbPool, DieselAuditLog, DieselMenuItemRepository, DieselRatingRepository,
    DieselRestaurantRepository, DieselUserRepository,
};
use menu_directory::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Storage ports plus the audit sink they write alongside.
struct StorageAdapters {
    repos: DirectoryRepositories,
    audit: Arc<dyn AuditLog>,
}

fn diesel_adapters(pool: &DbPool) -> StorageAdapters {
    StorageAdapters {
        repos: DirectoryRepositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            restaurants: Arc::new(DieselRestaurantRepository::new(pool.clone())),
            menu_items: Arc::new(DieselMenuItemRepository::new(pool.clone())),
            ratings: Arc::new(DieselRatingRepository::new(pool.clone())),
        },
        audit: Arc::new(DieselAuditLog::new(pool.clone())),
    }
}

fn in_memory_adapters() -> StorageAdapters {
    let directory = InMemoryDirectory::new();
    StorageAdapters {
        repos: DirectoryRepositories {
            users: Arc::new(directory.clone()),
            restaurants: Arc::new(directory.clone()),
            menu_items: Arc::new(directory.clone()),
            ratings: Arc::new(directory.clone()),
        },
        audit: Arc::new(directory),
    }
}

fn storage_adapters(pool: Option<&DbPool>) -> StorageAdapters {
    match pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            diesel_adapters(pool)
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            in_memory_adapters()
        }
    }
}

/// Wire every driving port over `storage` and bootstrap the root admin.
async fn build_ports(
    config: &ServerConfig,
    storage: StorageAdapters,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
) -> Result<HttpStatePorts, Error> {
    let StorageAdapters { repos, audit } = storage;
    let auditor = Auditor::new(audit, clock);

    let accounts = Arc::new(AccountService::new(
        repos.users.clone(),
        hasher,
        auditor.clone(),
    ));
    let root_admin = accounts
        .ensure_root_admin(
            &config.root_admin.username,
            config.root_admin.password.as_str(),
        )
        .await?;
    info!(user_id = %root_admin, "root admin ready");

    let content = Arc::new(ContentService::new(
        repos.clone(),
        auditor.clone(),
        config.currency.clone(),
    ));
    let search = Arc::new(SearchService::new(
        repos.restaurants.clone(),
        repos.menu_items.clone(),
    ));
    let admin = Arc::new(AdminService::new(repos, auditor, root_admin));

    Ok(HttpStatePorts {
        accounts,
        content: content.clone(),
        content_queries: content,
        admin,
        search,
    })
}

/// Build the shared HTTP state, choosing Diesel adapters when a pool is
/// configured and the in-memory directory otherwise.
pub(super) async fn build_http_state(config: &ServerConfig) -> Result<web::Data<HttpState>, Error> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let storage = storage_adapters(config.db_pool.as_ref());
    let ports = build_ports(
        config,
        storage,
        Arc::new(Argon2PasswordHasher::new()),
        clock.clone(),
    )
    .await?;
    Ok(web::Data::new(
        HttpState::new(ports)
            .with_session_policy(config.session_policy)
            .with_clock(clock),
    ))
}
