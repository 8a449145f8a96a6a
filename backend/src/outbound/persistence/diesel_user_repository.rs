//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account deletion and restaurant reassignment share one transaction so a
//! restaurant can never point at a deleted owner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, Role, User, UserAccount, UserId, Username};

use super::diesel_error_mapping::{map_user_diesel_error, map_user_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{ratings, restaurants, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(&row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))?;
    let role: Role = row
        .role
        .parse()
        .map_err(|err| UserPersistenceError::query(format!("stored role invalid: {err}")))?;
    Ok(User::new(UserId::from_uuid(row.id), username, role))
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let user = row_to_user(&row)?;
    Ok(UserAccount {
        user,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row = NewUserRow {
            id: *account.user.id().as_uuid(),
            username: account.user.username().as_ref(),
            password_hash: account.password_hash.as_str(),
            role: account.user.role().as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::username)
            .load(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        rows.iter().map(row_to_user).collect()
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let updated = diesel::update(users::table.find(id.as_uuid()))
            .set((
                users::role.eq(role.as_str()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        Ok(updated > 0)
    }

    async fn revoke_sessions(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        // Never move the cut-off backwards; a zero row count then means the
        // user is missing or already revoked later.
        let updated = diesel::update(
            users::table.find(id.as_uuid()).filter(
                users::sessions_revoked_at
                    .is_null()
                    .or(users::sessions_revoked_at.lt(at)),
            ),
        )
        .set(users::sessions_revoked_at.eq(at))
        .execute(&mut conn)
        .await
        .map_err(map_user_diesel_error)?;
        if updated > 0 {
            return Ok(true);
        }
        let existing: Option<Uuid> = users::table
            .find(id.as_uuid())
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        Ok(existing.is_some())
    }

    async fn sessions_revoked_at(
        &self,
        id: &UserId,
    ) -> Result<Option<DateTime<Utc>>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let revoked: Option<Option<DateTime<Utc>>> = users::table
            .find(id.as_uuid())
            .select(users::sessions_revoked_at)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        Ok(revoked.flatten())
    }

    async fn delete_reassigning(
        &self,
        id: &UserId,
        fallback_owner: &UserId,
    ) -> Result<Option<usize>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let id = *id.as_uuid();
        let fallback_owner = *fallback_owner.as_uuid();
        conn.transaction(|conn| {
            async move {
                let existing: Option<Uuid> = users::table
                    .find(id)
                    .select(users::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if existing.is_none() {
                    return Ok(None);
                }
                let reassigned = diesel::update(
                    restaurants::table.filter(restaurants::owner_id.eq(id)),
                )
                .set(restaurants::owner_id.eq(fallback_owner))
                .execute(conn)
                .await?;
                diesel::delete(ratings::table.filter(ratings::user_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(users::table.find(id)).execute(conn).await?;
                Ok::<_, diesel::result::Error>(Some(reassigned))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_user_diesel_error)
    }
}
