//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use menu_directory::domain::{CurrencySymbol, SessionPolicy};
use menu_directory::inbound::http::session_config::SessionSettings;
use menu_directory::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROOT_ADMIN: &str = "admin";

/// Errors raised while interpreting [`AppSettings`].
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("MENUS_ROOT_ADMIN_PASSWORD must be set")]
    MissingRootAdminPassword,
    #[error("invalid currency symbol '{value}'; expected 1 to 3 non-numeric characters")]
    CurrencySymbol { value: String },
}

/// Settings loaded via OrthoConfig from `MENUS_*` environment variables,
/// configuration files and command-line flags.
///
/// `pool_size` has a declared default; without one an empty environment
/// fails to merge.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MENUS")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_size: u32,
    /// Username of the undeletable root administrator.
    pub root_admin_username: Option<String>,
    /// Password used when the root administrator is first created.
    pub root_admin_password: Option<String>,
    /// Symbol prefixed to menu item prices.
    pub currency_symbol: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn root_admin(&self) -> Result<RootAdminCredentials, SettingsError> {
        let password = self
            .root_admin_password
            .clone()
            .filter(|password| !password.is_empty())
            .ok_or(SettingsError::MissingRootAdminPassword)?;
        Ok(RootAdminCredentials {
            username: self
                .root_admin_username
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_ADMIN.to_owned()),
            password: Zeroizing::new(password),
        })
    }

    pub fn currency_symbol(&self) -> Result<CurrencySymbol, SettingsError> {
        match self.currency_symbol.as_deref() {
            None => Ok(CurrencySymbol::default()),
            Some(value) => CurrencySymbol::new(value).map_err(|_| SettingsError::CurrencySymbol {
                value: value.to_owned(),
            }),
        }
    }
}

/// Root administrator bootstrap credentials.
#[derive(Clone)]
pub struct RootAdminCredentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_policy: SessionPolicy,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) root_admin: RootAdminCredentials,
    pub(crate) currency: CurrencySymbol,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        root_admin: RootAdminCredentials,
    ) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            session_policy: session.policy,
            bind_addr,
            root_admin,
            currency: CurrencySymbol::default(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    ///
    /// Without a pool every port is served by the in-memory directory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: CurrencySymbol) -> Self {
        self.currency = currency;
        self
    }
}
