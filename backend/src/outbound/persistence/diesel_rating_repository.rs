//! PostgreSQL-backed `RatingRepository` implementation using Diesel ORM.
//!
//! Re-rating relies on `ON CONFLICT` against `ratings_restaurant_user_key`,
//! so concurrent submissions from one user still leave a single row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ContentPersistenceError, RatingRepository};
use crate::domain::{Rating, RatingSummary, RestaurantId, Score, UserId};

use super::diesel_error_mapping::{map_content_diesel_error, map_content_pool_error};
use super::models::{NewRatingRow, RatingRow};
use super::pool::DbPool;
use super::schema::ratings;

/// Diesel-backed implementation of the `RatingRepository` port.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn stored_score(raw: i32) -> Result<Score, ContentPersistenceError> {
    Score::new(i64::from(raw))
        .map_err(|_| ContentPersistenceError::query(format!("stored score {raw} out of range")))
}

fn row_to_rating(row: RatingRow) -> Result<Rating, ContentPersistenceError> {
    Ok(Rating {
        restaurant_id: RestaurantId::from_uuid(row.restaurant_id),
        user_id: UserId::from_uuid(row.user_id),
        score: stored_score(row.score)?,
    })
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn upsert(&self, rating: &Rating) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let row = NewRatingRow {
            id: Uuid::new_v4(),
            restaurant_id: *rating.restaurant_id.as_uuid(),
            user_id: *rating.user_id.as_uuid(),
            score: i32::from(rating.score.value()),
        };
        diesel::insert_into(ratings::table)
            .values(&row)
            .on_conflict((ratings::restaurant_id, ratings::user_id))
            .do_update()
            .set((
                ratings::score.eq(excluded(ratings::score)),
                ratings::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_content_diesel_error)
    }

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        user_id: &UserId,
    ) -> Result<Option<Rating>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let row = ratings::table
            .filter(ratings::restaurant_id.eq(restaurant_id.as_uuid()))
            .filter(ratings::user_id.eq(user_id.as_uuid()))
            .select(RatingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_content_diesel_error)?;
        row.map(row_to_rating).transpose()
    }

    async fn summary(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<RatingSummary, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let scores: Vec<i32> = ratings::table
            .filter(ratings::restaurant_id.eq(restaurant_id.as_uuid()))
            .select(ratings::score)
            .load(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        let scores = scores
            .into_iter()
            .map(stored_score)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RatingSummary::from_scores(scores))
    }
}
