//! Shared Diesel error mapping for the directory repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::{ContentPersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => message,
    };
    connection(message)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Repositories that need to surface constraint violations match on those
/// first and fall through to this helper.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

pub(crate) fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

/// Unique violations on `users.username` become
/// [`UserPersistenceError::DuplicateUsername`].
pub(crate) fn map_user_diesel_error(error: DieselError) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(constraint = ?info.constraint_name(), "username already taken");
        return UserPersistenceError::duplicate_username();
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

pub(crate) fn map_content_pool_error(error: PoolError) -> ContentPersistenceError {
    map_basic_pool_error(error, ContentPersistenceError::connection)
}

/// Foreign key violations name the missing parent so services can answer
/// with a not-found error.
pub(crate) fn map_content_diesel_error(error: DieselError) -> ContentPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = &error {
        let reference = referenced_entity(info.constraint_name(), info.message());
        if reference.is_none() {
            warn!(
                message = info.message(),
                constraint_name = ?info.constraint_name(),
                "unrecognised foreign key violation"
            );
        }
        return ContentPersistenceError::missing_reference(reference.unwrap_or("record"));
    }
    map_basic_diesel_error(
        error,
        ContentPersistenceError::query,
        ContentPersistenceError::connection,
    )
}

fn referenced_entity(constraint_name: Option<&str>, message: &str) -> Option<&'static str> {
    let haystack = constraint_name.unwrap_or(message).to_lowercase();
    if haystack.contains("owner_id") || haystack.contains("user_id") {
        Some("owner")
    } else if haystack.contains("restaurant_id") {
        Some("Restaurant")
    } else {
        None
    }
}
