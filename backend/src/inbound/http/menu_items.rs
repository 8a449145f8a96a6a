//! Menu handlers nested under a restaurant.
//!
//! ```text
//! GET /api/v1/restaurants/{id}/menu
//! POST /api/v1/restaurants/{id}/menu {"name":"Soup","price":"4.5","course":"Starter"}
//! GET /api/v1/restaurants/{id}/menu/{item}
//! PUT /api/v1/restaurants/{id}/menu/{item} {"price":"5"}
//! DELETE /api/v1/restaurants/{id}/menu/{item}
//! ```
//!
//! An item addressed under a restaurant it does not belong to is reported
//! as not found.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, MenuItemDraft, MenuItemEdit, MenuItemId, RestaurantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::dto::{MenuItemMessageResponse, MenuItemResponse, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_menu_item_id, parse_restaurant_id};

/// New menu item. `name` and `price` are required; the price may omit the
/// currency symbol.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub course: Option<String>,
}

impl From<MenuItemRequest> for MenuItemDraft {
    fn from(value: MenuItemRequest) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            description: value.description,
            price: value.price.unwrap_or_default(),
            course: value.course,
        }
    }
}

impl From<MenuItemRequest> for MenuItemEdit {
    fn from(value: MenuItemRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            price: value.price,
            course: value.course,
        }
    }
}

fn item_path(path: &(String, String)) -> Result<(RestaurantId, MenuItemId), Error> {
    Ok((parse_restaurant_id(&path.0)?, parse_menu_item_id(&path.1)?))
}

/// List a restaurant's menu in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}/menu",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    responses(
        (status = 200, description = "Menu items", body = [MenuItemResponse]),
        (status = 404, description = "Restaurant not found", body = Error)
    ),
    tags = ["menu"],
    operation_id = "listMenu",
    security([])
)]
#[get("/restaurants/{id}/menu")]
pub async fn list_menu(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MenuItemResponse>>> {
    let restaurant_id = parse_restaurant_id(&path)?;
    let menu = state.content_queries.list_menu(restaurant_id).await?;
    Ok(web::Json(
        menu.items.iter().map(MenuItemResponse::from).collect(),
    ))
}

/// Add an item to a restaurant's menu. Owners and admins only.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{id}/menu",
    params(("id" = String, Path, description = "Restaurant id", format = "uuid")),
    request_body = MenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemMessageResponse),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Restaurant not found", body = Error)
    ),
    tags = ["menu"],
    operation_id = "createMenuItem"
)]
#[post("/restaurants/{id}/menu")]
pub async fn create_menu_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<MenuItemRequest>,
) -> ApiResult<HttpResponse> {
    let restaurant_id = parse_restaurant_id(&path)?;
    let actor = require_actor(&state, &session).await?;
    let item = state
        .content
        .create_menu_item(&actor, restaurant_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(MenuItemMessageResponse::new("Menu item created", &item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}/menu/{item}",
    params(
        ("id" = String, Path, description = "Restaurant id", format = "uuid"),
        ("item" = String, Path, description = "Menu item id", format = "uuid")
    ),
    responses(
        (status = 200, description = "Menu item", body = MenuItemResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["menu"],
    operation_id = "getMenuItem",
    security([])
)]
#[get("/restaurants/{id}/menu/{item}")]
pub async fn get_menu_item(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MenuItemResponse>> {
    let (restaurant_id, item_id) = item_path(&path)?;
    let item = state
        .content_queries
        .get_menu_item(restaurant_id, item_id)
        .await?;
    Ok(web::Json(MenuItemResponse::from(&item)))
}

/// Edit a menu item. Blank or absent fields keep their stored values.
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}/menu/{item}",
    params(
        ("id" = String, Path, description = "Restaurant id", format = "uuid"),
        ("item" = String, Path, description = "Menu item id", format = "uuid")
    ),
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated or unchanged", body = MenuItemMessageResponse),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["menu"],
    operation_id = "editMenuItem"
)]
#[put("/restaurants/{id}/menu/{item}")]
pub async fn edit_menu_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<MenuItemRequest>,
) -> ApiResult<web::Json<MenuItemMessageResponse>> {
    let (restaurant_id, item_id) = item_path(&path)?;
    let actor = require_actor(&state, &session).await?;
    let edited = state
        .content
        .edit_menu_item(&actor, restaurant_id, item_id, payload.into_inner().into())
        .await?;
    let message = if edited.changed {
        "Menu item updated"
    } else {
        "No changes were made"
    };
    Ok(web::Json(MenuItemMessageResponse::new(message, &edited.value)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}/menu/{item}",
    params(
        ("id" = String, Path, description = "Restaurant id", format = "uuid"),
        ("item" = String, Path, description = "Menu item id", format = "uuid")
    ),
    responses(
        (status = 200, description = "Menu item deleted", body = MessageResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Permission denied", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["menu"],
    operation_id = "deleteMenuItem"
)]
#[delete("/restaurants/{id}/menu/{item}")]
pub async fn delete_menu_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (restaurant_id, item_id) = item_path(&path)?;
    let actor = require_actor(&state, &session).await?;
    state
        .content
        .delete_menu_item(&actor, restaurant_id, item_id)
        .await?;
    Ok(web::Json(MessageResponse::new("Menu item deleted")))
}
