//! PostgreSQL-backed `MenuItemRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContentPersistenceError, MenuItemRepository};
use crate::domain::sanitize::search_key;
use crate::domain::{MenuItem, MenuItemId, RestaurantId, SearchTerm};

use super::diesel_error_mapping::{map_content_diesel_error, map_content_pool_error};
use super::models::{MenuItemRow, MenuItemUpdate};
use super::pool::DbPool;
use super::schema::menu_items;

/// Diesel-backed implementation of the `MenuItemRepository` port.
#[derive(Clone)]
pub struct DieselMenuItemRepository {
    pool: DbPool,
}

impl DieselMenuItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_item(row: MenuItemRow) -> MenuItem {
    MenuItem {
        id: MenuItemId::from_uuid(row.id),
        restaurant_id: RestaurantId::from_uuid(row.restaurant_id),
        name: row.name,
        description: row.description,
        price: row.price,
        course: row.course,
    }
}

fn item_to_row(item: &MenuItem) -> MenuItemRow {
    MenuItemRow {
        id: *item.id.as_uuid(),
        restaurant_id: *item.restaurant_id.as_uuid(),
        name: item.name.clone(),
        search_key: search_key(&item.name),
        description: item.description.clone(),
        price: item.price.clone(),
        course: item.course.clone(),
    }
}

#[async_trait]
impl MenuItemRepository for DieselMenuItemRepository {
    async fn insert(&self, item: &MenuItem) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        diesel::insert_into(menu_items::table)
            .values(&item_to_row(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_content_diesel_error)
    }

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<Option<MenuItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let row = menu_items::table
            .filter(menu_items::id.eq(id.as_uuid()))
            .filter(menu_items::restaurant_id.eq(restaurant_id.as_uuid()))
            .select(MenuItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_content_diesel_error)?;
        Ok(row.map(row_to_item))
    }

    async fn list_for_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let rows: Vec<MenuItemRow> = menu_items::table
            .filter(menu_items::restaurant_id.eq(restaurant_id.as_uuid()))
            .select(MenuItemRow::as_select())
            .order_by((menu_items::created_at, menu_items::id))
            .load(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn update(&self, item: &MenuItem) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let key = search_key(&item.name);
        let changes = MenuItemUpdate {
            name: &item.name,
            search_key: &key,
            description: &item.description,
            price: &item.price,
            course: &item.course,
        };
        let updated = diesel::update(
            menu_items::table
                .filter(menu_items::id.eq(item.id.as_uuid()))
                .filter(menu_items::restaurant_id.eq(item.restaurant_id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_content_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let deleted = diesel::delete(
            menu_items::table
                .filter(menu_items::id.eq(id.as_uuid()))
                .filter(menu_items::restaurant_id.eq(restaurant_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_content_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let pattern = format!("%{}%", term.as_str());
        let rows: Vec<MenuItemRow> = menu_items::table
            .filter(menu_items::search_key.like(pattern))
            .select(MenuItemRow::as_select())
            .order_by((menu_items::name, menu_items::id))
            .load(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }
}
