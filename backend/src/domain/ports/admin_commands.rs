//! Driving port for the admin console.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Restaurant, RestaurantId, Role, User, UserId};

/// Outcome of an ownership reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerReassignment {
    pub restaurant: Restaurant,
    /// `false` when the requested owner already owned the restaurant.
    pub changed: bool,
}

/// Administrator-only operations. Every call rejects non-admin actors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommands: Send + Sync {
    /// Users ordered by username.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error>;

    async fn set_user_role(&self, actor: &Actor, target: UserId, role: Role)
        -> Result<User, Error>;

    /// Delete a user after moving their restaurants to the root admin.
    /// Returns the number of restaurants reassigned.
    async fn delete_user(&self, actor: &Actor, target: UserId) -> Result<usize, Error>;

    async fn reassign_restaurant_owner(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        new_owner: UserId,
    ) -> Result<OwnerReassignment, Error>;

    /// Delete any restaurant regardless of owner.
    async fn force_delete_restaurant(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
    ) -> Result<(), Error>;
}
