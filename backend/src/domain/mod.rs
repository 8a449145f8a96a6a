//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for the directory (users,
//! restaurants, menu items, ratings), the validation structs that guard them,
//! and the services implementing the driving ports. Nothing here knows about
//! HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Role / User / Actor: identity and the authorization guard.
//! - AccountService, ContentService, AdminService, SearchService: driving
//!   port implementations.

pub mod account_service;
pub mod admin_service;
pub mod audit;
pub mod authorization;
pub mod content_service;
pub mod credentials;
pub mod error;
pub mod menu_item;
pub mod ports;
pub mod rating;
pub mod restaurant;
pub mod sanitize;
pub mod search;
pub mod search_service;
pub mod service_support;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS};
pub use self::admin_service::{AdminError, AdminService};
pub use self::audit::{AuditAction, AuditEvent, AuditOutcome};
pub use self::authorization::{
    can_modify, require_admin, require_modify, Actor, PERMISSION_DENIED,
};
pub use self::content_service::ContentService;
pub use self::credentials::{
    LoginCredentials, LoginValidationError, PasswordHash, PasswordPolicy, PasswordRule,
    RegistrationError, RegistrationForm, ValidatedRegistration,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::menu_item::{
    CurrencySymbol, MenuItem, MenuItemChanges, MenuItemDraft, MenuItemEdit, MenuItemId,
    NewMenuItem, Price,
};
pub use self::rating::{Rating, RatingError, RatingSummary, Score};
pub use self::restaurant::{
    ContentValidationError, Restaurant, RestaurantDraft, RestaurantId, RestaurantRename,
};
pub use self::search::{BlankSearchTerm, SearchResults, SearchTerm};
pub use self::search_service::SearchService;
pub use self::service_support::{Auditor, DirectoryRepositories};
pub use self::session::{Session, SessionGrant, SessionPolicy, SessionState};
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{Role, User, UserAccount, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use menu_directory::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("permission denied"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
