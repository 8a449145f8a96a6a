//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{audit_events, menu_items, ratings, restaurants, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Content models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    /// Lowercase alphanumeric form of `name` matched by searches.
    pub search_key: String,
    pub owner_id: Uuid,
}

/// Menu item row; also used for inserts since every column is supplied.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MenuItemRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub search_key: String,
    pub description: String,
    pub price: String,
    pub course: String,
}

/// Changeset for editing a menu item in place.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = menu_items)]
pub(crate) struct MenuItemUpdate<'a> {
    pub name: &'a str,
    pub search_key: &'a str,
    pub description: &'a str,
    pub price: &'a str,
    pub course: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub(crate) struct NewRatingRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
}

/// Row struct for reading from the ratings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
}

// ---------------------------------------------------------------------------
// Audit models
// ---------------------------------------------------------------------------

/// Insert-only row; audit events are never read back through Diesel.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub(crate) struct NewAuditEventRow<'a> {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub actor_id: Option<Uuid>,
    pub action: &'a str,
    pub target: &'a str,
    pub outcome: &'a str,
    pub detail: Option<&'a str>,
}
