//! Admin console handlers. Every endpoint rejects non-admin actors with 403.
//!
//! ```text
//! GET /api/v1/admin/users
//! PUT /api/v1/admin/users/{id}/role {"role":"owner"}
//! DELETE /api/v1/admin/users/{id}
//! PUT /api/v1/admin/restaurants/{id}/owner {"ownerId":"..."}
//! DELETE /api/v1/admin/restaurants/{id}
//! ```

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Role, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::dto::{
    MessageResponse, RestaurantResponse, UserMessageResponse, UserResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_restaurant_id, parse_role, parse_user_id,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    #[schema(value_type = Option<Role>)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignOwnerRequest {
    #[schema(format = "uuid")]
    pub owner_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletedResponse {
    pub message: String,
    /// Restaurants moved to the root administrator.
    pub reassigned_restaurants: usize,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReassignedResponse {
    pub message: String,
    /// `false` when the requested owner already owned the restaurant.
    pub changed: bool,
    pub restaurant: RestaurantResponse,
    #[schema(format = "uuid")]
    pub owner_id: String,
}

fn user_path_id(path: &str) -> Result<UserId, Error> {
    parse_user_id(path, FieldName::new("userId"))
}

/// List every account ordered by username.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let users = state.admin.list_users(&actor).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Change a user's role. The root administrator cannot be changed.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = String, Path, description = "User id", format = "uuid")),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserMessageResponse),
        (status = 400, description = "Unknown role", body = Error),
        (status = 403, description = "Permission denied or root admin", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetUserRole"
)]
#[put("/admin/users/{id}/role")]
pub async fn set_user_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SetRoleRequest>,
) -> ApiResult<web::Json<UserMessageResponse>> {
    let target = user_path_id(&path)?;
    let role = payload
        .into_inner()
        .role
        .ok_or_else(|| missing_field_error(FieldName::new("role")))?;
    let role = parse_role(&role)?;
    let actor = require_actor(&state, &session).await?;
    let user = state.admin.set_user_role(&actor, target, role).await?;
    Ok(web::Json(UserMessageResponse {
        message: format!("Role changed to {role}"),
        user: UserResponse::from(&user),
    }))
}

/// Delete a user, moving their restaurants to the root administrator.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id", format = "uuid")),
    responses(
        (status = 200, description = "User deleted", body = UserDeletedResponse),
        (status = 403, description = "Permission denied or root admin", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDeletedResponse>> {
    let target = user_path_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    let reassigned = state.admin.delete_user(&actor, target).await?;
    Ok(web::Json(UserDeletedResponse {
        message: "User deleted".to_owned(),
        reassigned_restaurants: reassigned,
    }))
}

/// Give a restaurant to another existing user.
#[utoipa::path(
    put,
    path = "/api/v1/admin/restaurants/{id}/owner",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    request_body = ReassignOwnerRequest,
    responses(
        (status = 200, description = "Owner reassigned or unchanged", body = OwnerReassignedResponse),
        (status = 400, description = "New owner does not exist", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Restaurant not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminReassignOwner"
)]
#[put("/admin/restaurants/{id}/owner")]
pub async fn reassign_owner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReassignOwnerRequest>,
) -> ApiResult<web::Json<OwnerReassignedResponse>> {
    let restaurant_id = parse_restaurant_id(&path)?;
    let owner = payload
        .into_inner()
        .owner_id
        .ok_or_else(|| missing_field_error(FieldName::new("ownerId")))?;
    let new_owner = parse_user_id(&owner, FieldName::new("ownerId"))?;
    let actor = require_actor(&state, &session).await?;
    let outcome = state
        .admin
        .reassign_restaurant_owner(&actor, restaurant_id, new_owner)
        .await?;
    let message = if outcome.changed {
        "Owner reassigned"
    } else {
        "That user already owns this restaurant; nothing changed"
    };
    Ok(web::Json(OwnerReassignedResponse {
        message: message.to_owned(),
        changed: outcome.changed,
        restaurant: RestaurantResponse::from(&outcome.restaurant),
        owner_id: outcome.restaurant.owner_id.to_string(),
    }))
}

/// Delete any restaurant regardless of owner.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    responses(
        (status = 200, description = "Restaurant deleted", body = MessageResponse),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Restaurant not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteRestaurant"
)]
#[delete("/admin/restaurants/{id}")]
pub async fn force_delete_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let restaurant_id = parse_restaurant_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    state
        .admin
        .force_delete_restaurant(&actor, restaurant_id)
        .await?;
    Ok(web::Json(MessageResponse::new("Restaurant deleted")))
}
