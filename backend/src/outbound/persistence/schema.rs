//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// Usernames are unique. Passwords are stored only as Argon2id PHC
    /// strings.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Alphanumeric login name (max 50 characters).
        username -> Varchar,
        /// Argon2id PHC string including its salt.
        password_hash -> Varchar,
        /// One of `public`, `owner` or `admin`.
        role -> Varchar,
        /// Session grants issued at or before this instant are rejected.
        sessions_revoked_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Restaurants and their owning user.
    restaurants (id) {
        id -> Uuid,
        /// Display name (max 250 characters).
        name -> Varchar,
        /// Unescaped, lowercase alphanumeric form of `name` for searches.
        search_key -> Varchar,
        /// Owning user; never dangling.
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Menu entries. Rows cascade with their restaurant.
    menu_items (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        name -> Varchar,
        search_key -> Varchar,
        /// Empty string when the item has no description.
        description -> Varchar,
        /// Formatted price including the currency symbol.
        price -> Varchar,
        /// Empty string when the item has no course.
        course -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One score per (restaurant, user) pair, enforced by
    /// `ratings_restaurant_user_key`.
    ratings (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        user_id -> Uuid,
        /// Score between 1 and 5 inclusive.
        score -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail. A trigger rejects updates and deletes.
    audit_events (id) {
        id -> Uuid,
        recorded_at -> Timestamptz,
        /// Acting user, `NULL` for anonymous requests.
        actor_id -> Nullable<Uuid>,
        action -> Varchar,
        target -> Varchar,
        outcome -> Varchar,
        detail -> Nullable<Text>,
    }
}

diesel::joinable!(restaurants -> users (owner_id));
diesel::joinable!(menu_items -> restaurants (restaurant_id));
diesel::joinable!(ratings -> restaurants (restaurant_id));
diesel::joinable!(ratings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    restaurants,
    menu_items,
    ratings,
    audit_events,
);
