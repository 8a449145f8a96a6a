//! Driving ports for restaurant, menu and rating use-cases.

use async_trait::async_trait;

use crate::domain::{
    Actor, Error, MenuItem, MenuItemDraft, MenuItemEdit, MenuItemId, Rating, RatingSummary,
    Restaurant, RestaurantId,
};

/// Result of an edit that may have been a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited<T> {
    pub value: T,
    pub changed: bool,
}

/// Mutating content operations. Every call is authorized against `actor`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCommands: Send + Sync {
    async fn create_restaurant(&self, actor: &Actor, name: &str) -> Result<Restaurant, Error>;

    async fn edit_restaurant(
        &self,
        actor: &Actor,
        id: RestaurantId,
        new_name: Option<String>,
    ) -> Result<Edited<Restaurant>, Error>;

    async fn delete_restaurant(&self, actor: &Actor, id: RestaurantId) -> Result<(), Error>;

    async fn create_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, Error>;

    async fn edit_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        id: MenuItemId,
        edit: MenuItemEdit,
    ) -> Result<Edited<MenuItem>, Error>;

    async fn delete_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        id: MenuItemId,
    ) -> Result<(), Error>;

    async fn rate_restaurant(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        score: i64,
    ) -> Result<Rating, Error>;
}

/// A restaurant together with its rating aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDetail {
    pub restaurant: Restaurant,
    pub rating: RatingSummary,
}

/// A restaurant and its menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub restaurant: Restaurant,
    pub items: Vec<MenuItem>,
}

/// Read-only content operations available to anonymous visitors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQueries: Send + Sync {
    /// Restaurants ordered by name ascending.
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, Error>;

    async fn get_restaurant(&self, id: RestaurantId) -> Result<RestaurantDetail, Error>;

    async fn list_menu(&self, restaurant_id: RestaurantId) -> Result<Menu, Error>;

    async fn get_menu_item(
        &self,
        restaurant_id: RestaurantId,
        id: MenuItemId,
    ) -> Result<MenuItem, Error>;
}
