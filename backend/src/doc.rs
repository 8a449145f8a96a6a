//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (accounts,
//!   restaurants, menus, ratings, search, admin console, health)
//! - **Schemas**: request and response DTOs plus the domain error envelope
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest, RegisteredResponse};
use crate::inbound::http::admin::{
    OwnerReassignedResponse, ReassignOwnerRequest, SetRoleRequest, UserDeletedResponse,
};
use crate::inbound::http::dto::{
    MenuItemMessageResponse, MenuItemResponse, MessageResponse, RatingSummaryResponse,
    RestaurantDetailResponse, RestaurantMessageResponse, RestaurantResponse, UserMessageResponse,
    UserResponse,
};
use crate::inbound::http::menu_items::MenuItemRequest;
use crate::inbound::http::restaurants::{
    CreateRestaurantRequest, EditRestaurantRequest, RateRestaurantRequest, RatingResponse,
};
use crate::inbound::http::search::{MenuItemMatch, SearchResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Menu directory API",
        description = "Restaurants, menus and ratings with role-based editing and an admin console.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::restaurants::get_restaurant,
        crate::inbound::http::restaurants::edit_restaurant,
        crate::inbound::http::restaurants::delete_restaurant,
        crate::inbound::http::restaurants::rate_restaurant,
        crate::inbound::http::menu_items::list_menu,
        crate::inbound::http::menu_items::create_menu_item,
        crate::inbound::http::menu_items::get_menu_item,
        crate::inbound::http::menu_items::edit_menu_item,
        crate::inbound::http::menu_items::delete_menu_item,
        crate::inbound::http::search::search,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::set_user_role,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::reassign_owner,
        crate::inbound::http::admin::force_delete_restaurant,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        RegisterRequest,
        RegisteredResponse,
        LoginRequest,
        UserResponse,
        UserMessageResponse,
        MessageResponse,
        RestaurantResponse,
        RestaurantDetailResponse,
        RestaurantMessageResponse,
        RatingSummaryResponse,
        CreateRestaurantRequest,
        EditRestaurantRequest,
        RateRestaurantRequest,
        RatingResponse,
        MenuItemRequest,
        MenuItemResponse,
        MenuItemMessageResponse,
        SearchResponse,
        MenuItemMatch,
        SetRoleRequest,
        ReassignOwnerRequest,
        UserDeletedResponse,
        OwnerReassignedResponse,
    )),
    tags(
        (name = "accounts", description = "Registration, login and sessions"),
        (name = "restaurants", description = "Restaurants and their ratings"),
        (name = "menu", description = "Menu items of a restaurant"),
        (name = "search", description = "Name search across the directory"),
        (name = "admin", description = "Administrator console"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
