//! Port abstraction for restaurant persistence.
use async_trait::async_trait;

use crate::domain::{Restaurant, RestaurantId, SearchTerm, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors shared by the restaurant, menu item and rating
    /// repositories.
    pub enum ContentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "content repository query failed: {message}",
        /// A referenced row (owner, restaurant or user) does not exist.
        MissingReference { message: String } => "referenced record missing: {message}",
    }
}

/// Driven port over stored restaurants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Insert a restaurant and promote its owner from public to owner in the
    /// same transaction. Owners and admins keep their role.
    async fn insert_promoting_owner(
        &self,
        restaurant: &Restaurant,
    ) -> Result<(), ContentPersistenceError>;

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, ContentPersistenceError>;

    /// All restaurants ordered by name ascending.
    async fn list_all(&self) -> Result<Vec<Restaurant>, ContentPersistenceError>;

    /// Returns `false` when the restaurant does not exist.
    async fn rename(&self, id: &RestaurantId, name: &str) -> Result<bool, ContentPersistenceError>;

    /// Delete a restaurant together with its menu items and ratings.
    /// Returns `false` when the restaurant does not exist.
    async fn delete_cascading(&self, id: &RestaurantId) -> Result<bool, ContentPersistenceError>;

    /// Point the restaurant at a new owner and promote that owner from public
    /// to owner, atomically. Returns `false` when the restaurant does not exist.
    async fn reassign_owner(
        &self,
        id: &RestaurantId,
        new_owner: &UserId,
    ) -> Result<bool, ContentPersistenceError>;

    /// Restaurants whose [`search_key`](crate::domain::sanitize::search_key)
    /// contains the term, ordered by name then id.
    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Restaurant>, ContentPersistenceError>;
}
