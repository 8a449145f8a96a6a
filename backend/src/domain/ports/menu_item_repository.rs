//! Port abstraction for menu item persistence.
use async_trait::async_trait;

use crate::domain::{MenuItem, MenuItemId, RestaurantId, SearchTerm};

use super::ContentPersistenceError;

/// Driven port over stored menu items.
///
/// Lookups are always scoped to the owning restaurant so an item cannot be
/// reached through another restaurant's path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn insert(&self, item: &MenuItem) -> Result<(), ContentPersistenceError>;

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<Option<MenuItem>, ContentPersistenceError>;

    async fn list_for_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError>;

    /// Overwrite the editable fields. Returns `false` when no row matched.
    async fn update(&self, item: &MenuItem) -> Result<bool, ContentPersistenceError>;

    /// Returns `false` when no row matched.
    async fn delete(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<bool, ContentPersistenceError>;

    /// Menu items whose [`search_key`](crate::domain::sanitize::search_key)
    /// contains the term, ordered by name then id.
    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError>;
}
