//! Port abstraction for rating persistence.
use async_trait::async_trait;

use crate::domain::{Rating, RatingSummary, RestaurantId, UserId};

use super::ContentPersistenceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert the rating or overwrite the score of the existing
    /// (restaurant, user) row as one atomic statement.
    async fn upsert(&self, rating: &Rating) -> Result<(), ContentPersistenceError>;

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        user_id: &UserId,
    ) -> Result<Option<Rating>, ContentPersistenceError>;

    async fn summary(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<RatingSummary, ContentPersistenceError>;
}
