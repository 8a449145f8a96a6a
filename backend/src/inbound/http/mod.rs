//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod menu_items;
pub mod restaurants;
pub mod search;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The caller wraps the scope with the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(restaurants::list_restaurants)
        .service(restaurants::create_restaurant)
        .service(restaurants::get_restaurant)
        .service(restaurants::edit_restaurant)
        .service(restaurants::delete_restaurant)
        .service(restaurants::rate_restaurant)
        .service(menu_items::list_menu)
        .service(menu_items::create_menu_item)
        .service(menu_items::get_menu_item)
        .service(menu_items::edit_menu_item)
        .service(menu_items::delete_menu_item)
        .service(search::search)
        .service(admin::list_users)
        .service(admin::set_user_role)
        .service(admin::delete_user)
        .service(admin::reassign_owner)
        .service(admin::force_delete_restaurant);
}
