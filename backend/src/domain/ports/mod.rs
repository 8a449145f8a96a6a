//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AuditLog`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports ([`AccountCommands`],
//! [`ContentCommands`], [`ContentQueries`], [`AdminCommands`],
//! [`DirectorySearch`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_commands;
mod admin_commands;
mod audit_log;
mod content_commands;
mod directory_search;
mod menu_item_repository;
mod password_hasher;
mod rating_repository;
mod restaurant_repository;
mod user_repository;

#[cfg(test)]
pub use account_commands::MockAccountCommands;
pub use account_commands::AccountCommands;
#[cfg(test)]
pub use admin_commands::MockAdminCommands;
pub use admin_commands::{AdminCommands, OwnerReassignment};
#[cfg(test)]
pub use audit_log::MockAuditLog;
pub use audit_log::{AuditLog, AuditLogError};
#[cfg(test)]
pub use content_commands::{MockContentCommands, MockContentQueries};
pub use content_commands::{ContentCommands, ContentQueries, Edited, Menu, RestaurantDetail};
#[cfg(test)]
pub use directory_search::MockDirectorySearch;
pub use directory_search::DirectorySearch;
#[cfg(test)]
pub use menu_item_repository::MockMenuItemRepository;
pub use menu_item_repository::MenuItemRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::RatingRepository;
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::{ContentPersistenceError, RestaurantRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
