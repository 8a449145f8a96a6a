//! Name search handler.
//!
//! ```text
//! GET /api/v1/search?q=soup
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, MenuItem, SearchResults};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MenuItemResponse, RestaurantResponse};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Text to look for; only letters and digits are considered.
    #[serde(default)]
    pub q: String,
}

/// A matching menu item with the restaurant it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemMatch {
    #[schema(format = "uuid")]
    pub restaurant_id: String,
    #[serde(flatten)]
    pub item: MenuItemResponse,
}

impl From<&MenuItem> for MenuItemMatch {
    fn from(item: &MenuItem) -> Self {
        Self {
            restaurant_id: item.restaurant_id.to_string(),
            item: item.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub restaurants: Vec<RestaurantResponse>,
    pub menu_items: Vec<MenuItemMatch>,
}

impl From<SearchResults> for SearchResponse {
    fn from(results: SearchResults) -> Self {
        Self {
            restaurants: results.restaurants.iter().map(RestaurantResponse::from).collect(),
            menu_items: results.menu_items.iter().map(MenuItemMatch::from).collect(),
        }
    }
}

/// Case-insensitive substring search over restaurant and menu item names.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches", body = SearchResponse),
        (status = 400, description = "Query has no letters or digits", body = Error)
    ),
    tags = ["search"],
    operation_id = "search",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<SearchResponse>> {
    let results = state.search.search(&query.q).await?;
    Ok(web::Json(results.into()))
}
