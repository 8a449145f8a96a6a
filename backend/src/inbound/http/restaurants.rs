//! Restaurant handlers, including ratings.
//!
//! ```text
//! GET /api/v1/restaurants
//! POST /api/v1/restaurants {"name":"Joe's"}
//! GET /api/v1/restaurants/{id}
//! PUT /api/v1/restaurants/{id} {"name":"Joe's Diner"}
//! DELETE /api/v1/restaurants/{id}
//! PUT /api/v1/restaurants/{id}/rating {"score":4}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::dto::{
    MessageResponse, RestaurantDetailResponse, RestaurantMessageResponse, RestaurantResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_restaurant_id};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    pub name: Option<String>,
}

/// An absent or blank name leaves the restaurant unchanged.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRestaurantRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateRestaurantRequest {
    /// Whole number from 1 to 5.
    #[schema(value_type = i64, minimum = 1, maximum = 5)]
    pub score: Value,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub message: String,
    #[schema(format = "uuid")]
    pub restaurant_id: String,
    pub score: u8,
}

/// Scores that are not whole numbers become 0 so the content service still
/// runs its ownership check before rejecting the value.
fn raw_score(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number.as_i64().unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// List restaurants ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    responses(
        (status = 200, description = "Restaurants", body = [RestaurantResponse]),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants",
    security([])
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RestaurantResponse>>> {
    let restaurants = state.content_queries.list_restaurants().await?;
    Ok(web::Json(
        restaurants.iter().map(RestaurantResponse::from).collect(),
    ))
}

/// Create a restaurant owned by the caller.
///
/// The name keeps only letters and digits. Public users become owners.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantMessageResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("/restaurants")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRestaurantRequest>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let restaurant = state.content.create_restaurant(&actor, &name).await?;
    Ok(HttpResponse::Created().json(RestaurantMessageResponse::new(
        "Restaurant created",
        &restaurant,
    )))
}

/// Fetch a restaurant with its rating summary.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantDetailResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "getRestaurant",
    security([])
)]
#[get("/restaurants/{id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RestaurantDetailResponse>> {
    let id = parse_restaurant_id(&path)?;
    let detail = state.content_queries.get_restaurant(id).await?;
    Ok(web::Json(detail.into()))
}

/// Rename a restaurant. Owners and admins only.
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    request_body = EditRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated or unchanged", body = RestaurantMessageResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "editRestaurant"
)]
#[put("/restaurants/{id}")]
pub async fn edit_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditRestaurantRequest>,
) -> ApiResult<web::Json<RestaurantMessageResponse>> {
    let id = parse_restaurant_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    let edited = state
        .content
        .edit_restaurant(&actor, id, payload.into_inner().name)
        .await?;
    Ok(web::Json(RestaurantMessageResponse::edited(
        &edited,
        "Restaurant updated",
    )))
}

/// Delete a restaurant with its menu and ratings. Owners and admins only.
#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    responses(
        (status = 200, description = "Restaurant deleted", body = MessageResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/restaurants/{id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_restaurant_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    state.content.delete_restaurant(&actor, id).await?;
    Ok(web::Json(MessageResponse::new("Restaurant deleted")))
}

/// Rate a restaurant from 1 to 5. Rating again replaces the earlier score;
/// owners cannot rate their own restaurant.
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}/rating",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    request_body = RateRestaurantRequest,
    responses(
        (status = 200, description = "Rating saved", body = RatingResponse),
        (status = 400, description = "Invalid rating", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Owner cannot rate", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "rateRestaurant"
)]
#[put("/restaurants/{id}/rating")]
pub async fn rate_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RateRestaurantRequest>,
) -> ApiResult<web::Json<RatingResponse>> {
    let id = parse_restaurant_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    let rating = state
        .content
        .rate_restaurant(&actor, id, raw_score(&payload.score))
        .await?;
    Ok(web::Json(RatingResponse {
        message: "Rating saved".to_owned(),
        restaurant_id: rating.restaurant_id.to_string(),
        score: rating.score.value(),
    }))
}
