//! Star ratings left by users on restaurants.

use serde_json::json;

use super::restaurant::RestaurantId;
use super::user::UserId;
use super::Error;

/// Rating failures surfaced by the content service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating must be a whole number from 1 to 5")]
    InvalidRating,
    #[error("owners cannot rate their own restaurant")]
    OwnerCannotRate,
}

impl From<RatingError> for Error {
    fn from(value: RatingError) -> Self {
        match value {
            RatingError::InvalidRating => Error::invalid_request(value.to_string())
                .with_details(json!({ "field": "score", "code": "invalid_rating" })),
            RatingError::OwnerCannotRate => Error::forbidden("You cannot rate your own restaurant"),
        }
    }
}

/// Integer score between one and five stars.
///
/// # Examples
/// ```
/// use menu_directory::domain::Score;
///
/// assert_eq!(Score::new(5).unwrap().value(), 5);
/// assert!(Score::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score(u8);

impl Score {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(raw: i64) -> Result<Self, RatingError> {
        if !(Self::MIN..=Self::MAX).contains(&raw) {
            return Err(RatingError::InvalidRating);
        }
        u8::try_from(raw)
            .map(Self)
            .map_err(|_| RatingError::InvalidRating)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A user's rating of one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub restaurant_id: RestaurantId,
    pub user_id: UserId,
    pub score: Score,
}

/// Aggregate rating for a restaurant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub count: u64,
    pub average: Option<f64>,
}

impl RatingSummary {
    pub fn empty() -> Self {
        Self {
            count: 0,
            average: None,
        }
    }

    /// Summarise a set of scores.
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let (count, total) = scores
            .into_iter()
            .fold((0_u64, 0_u64), |(count, total), score| {
                (count + 1, total + u64::from(score.value()))
            });
        if count == 0 {
            return Self::empty();
        }
        let average = total as f64 / count as f64;
        Self {
            count,
            average: Some(average),
        }
    }
}
