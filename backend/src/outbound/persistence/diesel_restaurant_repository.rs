//! PostgreSQL-backed `RestaurantRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ContentPersistenceError, RestaurantRepository};
use crate::domain::sanitize::search_key;
use crate::domain::{Restaurant, RestaurantId, Role, SearchTerm, UserId};

use super::diesel_error_mapping::{map_content_diesel_error, map_content_pool_error};
use super::models::RestaurantRow;
use super::pool::DbPool;
use super::schema::{restaurants, users};

/// Diesel-backed implementation of the `RestaurantRepository` port.
///
/// Menu items and ratings are removed with their restaurant through
/// `ON DELETE CASCADE` foreign keys.
#[derive(Clone)]
pub struct DieselRestaurantRepository {
    pool: DbPool,
}

impl DieselRestaurantRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_restaurant(row: RestaurantRow) -> Restaurant {
    Restaurant {
        id: RestaurantId::from_uuid(row.id),
        name: row.name,
        owner_id: UserId::from_uuid(row.owner_id),
    }
}

/// Raise a public user to owner. Owners and admins keep their role.
async fn promote_if_public(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> Result<(), diesel::result::Error> {
    diesel::update(
        users::table
            .filter(users::id.eq(user_id))
            .filter(users::role.eq(Role::Public.as_str())),
    )
    .set((
        users::role.eq(Role::Owner.as_str()),
        users::updated_at.eq(diesel::dsl::now),
    ))
    .execute(conn)
    .await
    .map(|_| ())
}

#[async_trait]
impl RestaurantRepository for DieselRestaurantRepository {
    async fn insert_promoting_owner(
        &self,
        restaurant: &Restaurant,
    ) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let row = RestaurantRow {
            id: *restaurant.id.as_uuid(),
            name: restaurant.name.clone(),
            search_key: search_key(&restaurant.name),
            owner_id: *restaurant.owner_id.as_uuid(),
        };
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(restaurants::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                promote_if_public(conn, row.owner_id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_content_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let row = restaurants::table
            .find(id.as_uuid())
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_content_diesel_error)?;
        Ok(row.map(row_to_restaurant))
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let rows: Vec<RestaurantRow> = restaurants::table
            .select(RestaurantRow::as_select())
            .order_by((restaurants::name, restaurants::id))
            .load(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(rows.into_iter().map(row_to_restaurant).collect())
    }

    async fn rename(&self, id: &RestaurantId, name: &str) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let updated = diesel::update(restaurants::table.find(id.as_uuid()))
            .set((
                restaurants::name.eq(name),
                restaurants::search_key.eq(search_key(name)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_cascading(&self, id: &RestaurantId) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let deleted = diesel::delete(restaurants::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn reassign_owner(
        &self,
        id: &RestaurantId,
        new_owner: &UserId,
    ) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        let id = *id.as_uuid();
        let new_owner = *new_owner.as_uuid();
        // `None` signals a missing owner so the caller can report it.
        let outcome = conn
            .transaction(|conn| {
                async move {
                    let owner: Option<Uuid> = users::table
                        .find(new_owner)
                        .select(users::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if owner.is_none() {
                        return Ok(None);
                    }
                    let updated = diesel::update(restaurants::table.find(id))
                        .set(restaurants::owner_id.eq(new_owner))
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(Some(false));
                    }
                    promote_if_public(conn, new_owner).await?;
                    Ok::<_, diesel::result::Error>(Some(true))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_content_diesel_error)?;
        outcome.ok_or_else(|| ContentPersistenceError::missing_reference("owner"))
    }

    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Restaurant>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_content_pool_error)?;
        // Terms are lowercase alphanumerics, so no LIKE wildcards need
        // escaping and the key needs no case folding.
        let pattern = format!("%{}%", term.as_str());
        let rows: Vec<RestaurantRow> = restaurants::table
            .filter(restaurants::search_key.like(pattern))
            .select(RestaurantRow::as_select())
            .order_by((restaurants::name, restaurants::id))
            .load(&mut conn)
            .await
            .map_err(map_content_diesel_error)?;
        Ok(rows.into_iter().map(row_to_restaurant).collect())
    }
}
