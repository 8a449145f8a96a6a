//! Response payloads shared by the HTTP handlers.
//!
//! Domain entities stay free of serialisation concerns; these DTOs fix the
//! wire shape. Restaurants deliberately omit their owner.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{Edited, RestaurantDetail};
use crate::domain::{MenuItem, RatingSummary, Restaurant, Role, User};

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            role: user.role(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
}

impl From<&Restaurant> for RestaurantResponse {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price including the configured currency symbol, e.g. `$8.50`.
    pub price: String,
    pub course: String,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.clone(),
            course: item.course.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummaryResponse {
    pub count: u64,
    /// Absent while the restaurant has no ratings.
    pub average: Option<f64>,
}

impl From<RatingSummary> for RatingSummaryResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            count: summary.count,
            average: summary.average,
        }
    }
}

/// A restaurant with its rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub rating: RatingSummaryResponse,
}

impl From<RestaurantDetail> for RestaurantDetailResponse {
    fn from(detail: RestaurantDetail) -> Self {
        Self {
            restaurant: RestaurantResponse::from(&detail.restaurant),
            rating: detail.rating.into(),
        }
    }
}

/// Acknowledgement for mutations that return no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantMessageResponse {
    pub message: String,
    pub restaurant: RestaurantResponse,
}

impl RestaurantMessageResponse {
    pub fn new(message: impl Into<String>, restaurant: &Restaurant) -> Self {
        Self {
            message: message.into(),
            restaurant: restaurant.into(),
        }
    }

    /// Acknowledge an edit, noting when nothing changed.
    pub fn edited(edited: &Edited<Restaurant>, changed: &str) -> Self {
        let message = if edited.changed {
            changed
        } else {
            "No changes were made"
        };
        Self::new(message, &edited.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemMessageResponse {
    pub message: String,
    pub menu_item: MenuItemResponse,
}

impl MenuItemMessageResponse {
    pub fn new(message: impl Into<String>, item: &MenuItem) -> Self {
        Self {
            message: message.into(),
            menu_item: item.into(),
        }
    }
}
