//! In-process implementation of every storage port.
//!
//! Used when no database URL is configured and by behaviour tests. All
//! collections live behind one mutex, so each port call is atomic with
//! respect to every other call, mirroring the transactions of the Diesel
//! adapters. Listings and search results are sorted the way the Diesel
//! adapters order them: by name, then by id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AuditLog, AuditLogError, ContentPersistenceError, MenuItemRepository, RatingRepository,
    RestaurantRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuditEvent, MenuItem, MenuItemId, Rating, RatingSummary, Restaurant, RestaurantId, Role,
    SearchTerm, User, UserAccount, UserId,
};

use super::audit_trace::trace_audit_event;

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<UserAccount>,
    revocations: HashMap<UserId, DateTime<Utc>>,
    restaurants: Vec<Restaurant>,
    menu_items: Vec<MenuItem>,
    ratings: Vec<Rating>,
    audit: Vec<AuditEvent>,
}

impl DirectoryState {
    fn user_mut(&mut self, id: &UserId) -> Option<&mut UserAccount> {
        self.users.iter_mut().find(|account| account.user.id() == *id)
    }

    fn has_user(&self, id: &UserId) -> bool {
        self.users.iter().any(|account| account.user.id() == *id)
    }

    fn has_restaurant(&self, id: &RestaurantId) -> bool {
        self.restaurants.iter().any(|restaurant| restaurant.id == *id)
    }

    fn promote_if_public(&mut self, id: &UserId) {
        if let Some(account) = self.user_mut(id) {
            if account.user.role() == Role::Public {
                account.user = account.user.clone().with_role(Role::Owner);
            }
        }
    }
}

/// Shared in-memory directory. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory directory lock poisoned".to_owned())
    }

    fn lock_users(&self) -> Result<MutexGuard<'_, DirectoryState>, UserPersistenceError> {
        self.lock().map_err(UserPersistenceError::connection)
    }

    fn lock_content(&self) -> Result<MutexGuard<'_, DirectoryState>, ContentPersistenceError> {
        self.lock().map_err(ContentPersistenceError::connection)
    }

    /// Snapshot of every audit event recorded so far, oldest first.
    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.lock()
            .map(|state| state.audit.clone())
            .unwrap_or_default()
    }

    /// Number of stored rating rows, for assertions on upsert behaviour.
    pub fn rating_rows(&self) -> usize {
        self.lock().map(|state| state.ratings.len()).unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.lock_users()?;
        let username = account.user.username();
        if state
            .users
            .iter()
            .any(|existing| existing.user.username() == username)
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        state.users.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock_users()?;
        Ok(state
            .users
            .iter()
            .find(|account| account.user.id() == *id)
            .map(|account| account.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.lock_users()?;
        Ok(state
            .users
            .iter()
            .find(|account| account.user.username().as_ref() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock_users()?;
        let mut users: Vec<User> = state.users.iter().map(|account| account.user.clone()).collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock_users()?;
        Ok(match state.user_mut(id) {
            Some(account) => {
                account.user = account.user.clone().with_role(role);
                true
            }
            None => false,
        })
    }

    async fn revoke_sessions(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock_users()?;
        if !state.has_user(id) {
            return Ok(false);
        }
        let revoked = state.revocations.entry(*id).or_insert(at);
        *revoked = (*revoked).max(at);
        Ok(true)
    }

    async fn sessions_revoked_at(
        &self,
        id: &UserId,
    ) -> Result<Option<DateTime<Utc>>, UserPersistenceError> {
        Ok(self.lock_users()?.revocations.get(id).copied())
    }

    async fn delete_reassigning(
        &self,
        id: &UserId,
        fallback_owner: &UserId,
    ) -> Result<Option<usize>, UserPersistenceError> {
        let mut state = self.lock_users()?;
        if !state.has_user(id) {
            return Ok(None);
        }
        if !state.has_user(fallback_owner) {
            return Err(UserPersistenceError::query("fallback owner does not exist"));
        }
        let mut reassigned = 0;
        for restaurant in state.restaurants.iter_mut().filter(|r| r.owner_id == *id) {
            restaurant.owner_id = *fallback_owner;
            reassigned += 1;
        }
        state.ratings.retain(|rating| rating.user_id != *id);
        state.users.retain(|account| account.user.id() != *id);
        state.revocations.remove(id);
        Ok(Some(reassigned))
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryDirectory {
    async fn insert_promoting_owner(
        &self,
        restaurant: &Restaurant,
    ) -> Result<(), ContentPersistenceError> {
        let mut state = self.lock_content()?;
        if !state.has_user(&restaurant.owner_id) {
            return Err(ContentPersistenceError::missing_reference("owner"));
        }
        state.restaurants.push(restaurant.clone());
        state.promote_if_public(&restaurant.owner_id);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, ContentPersistenceError> {
        let state = self.lock_content()?;
        Ok(state.restaurants.iter().find(|r| r.id == *id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, ContentPersistenceError> {
        let state = self.lock_content()?;
        let mut restaurants = state.restaurants.clone();
        restaurants.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(restaurants)
    }

    async fn rename(&self, id: &RestaurantId, name: &str) -> Result<bool, ContentPersistenceError> {
        let mut state = self.lock_content()?;
        Ok(match state.restaurants.iter_mut().find(|r| r.id == *id) {
            Some(restaurant) => {
                name.clone_into(&mut restaurant.name);
                true
            }
            None => false,
        })
    }

    async fn delete_cascading(&self, id: &RestaurantId) -> Result<bool, ContentPersistenceError> {
        let mut state = self.lock_content()?;
        if !state.has_restaurant(id) {
            return Ok(false);
        }
        state.menu_items.retain(|item| item.restaurant_id != *id);
        state.ratings.retain(|rating| rating.restaurant_id != *id);
        state.restaurants.retain(|restaurant| restaurant.id != *id);
        Ok(true)
    }

    async fn reassign_owner(
        &self,
        id: &RestaurantId,
        new_owner: &UserId,
    ) -> Result<bool, ContentPersistenceError> {
        let mut state = self.lock_content()?;
        if !state.has_user(new_owner) {
            return Err(ContentPersistenceError::missing_reference("owner"));
        }
        let Some(restaurant) = state.restaurants.iter_mut().find(|r| r.id == *id) else {
            return Ok(false);
        };
        restaurant.owner_id = *new_owner;
        state.promote_if_public(new_owner);
        Ok(true)
    }

    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Restaurant>, ContentPersistenceError> {
        let state = self.lock_content()?;
        let mut found: Vec<Restaurant> = state
            .restaurants
            .iter()
            .filter(|restaurant| term.matches(&restaurant.name))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(found)
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryDirectory {
    async fn insert(&self, item: &MenuItem) -> Result<(), ContentPersistenceError> {
        let mut state = self.lock_content()?;
        if !state.has_restaurant(&item.restaurant_id) {
            return Err(ContentPersistenceError::missing_reference("restaurant"));
        }
        state.menu_items.push(item.clone());
        Ok(())
    }

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<Option<MenuItem>, ContentPersistenceError> {
        let state = self.lock_content()?;
        Ok(state
            .menu_items
            .iter()
            .find(|item| item.id == *id && item.restaurant_id == *restaurant_id)
            .cloned())
    }

    async fn list_for_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError> {
        let state = self.lock_content()?;
        Ok(state
            .menu_items
            .iter()
            .filter(|item| item.restaurant_id == *restaurant_id)
            .cloned()
            .collect())
    }

    async fn update(&self, item: &MenuItem) -> Result<bool, ContentPersistenceError> {
        let mut state = self.lock_content()?;
        Ok(
            match state
                .menu_items
                .iter_mut()
                .find(|stored| stored.id == item.id && stored.restaurant_id == item.restaurant_id)
            {
                Some(stored) => {
                    *stored = item.clone();
                    true
                }
                None => false,
            },
        )
    }

    async fn delete(
        &self,
        restaurant_id: &RestaurantId,
        id: &MenuItemId,
    ) -> Result<bool, ContentPersistenceError> {
        let mut state = self.lock_content()?;
        let before = state.menu_items.len();
        state
            .menu_items
            .retain(|item| !(item.id == *id && item.restaurant_id == *restaurant_id));
        Ok(state.menu_items.len() != before)
    }

    async fn search_by_name(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<MenuItem>, ContentPersistenceError> {
        let state = self.lock_content()?;
        let mut found: Vec<MenuItem> = state
            .menu_items
            .iter()
            .filter(|item| term.matches(&item.name))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(found)
    }
}

#[async_trait]
impl RatingRepository for InMemoryDirectory {
    async fn upsert(&self, rating: &Rating) -> Result<(), ContentPersistenceError> {
        let mut state = self.lock_content()?;
        if !state.has_restaurant(&rating.restaurant_id) {
            return Err(ContentPersistenceError::missing_reference("restaurant"));
        }
        if !state.has_user(&rating.user_id) {
            return Err(ContentPersistenceError::missing_reference("user"));
        }
        match state.ratings.iter_mut().find(|stored| {
            stored.restaurant_id == rating.restaurant_id && stored.user_id == rating.user_id
        }) {
            Some(stored) => stored.score = rating.score,
            None => state.ratings.push(*rating),
        }
        Ok(())
    }

    async fn find(
        &self,
        restaurant_id: &RestaurantId,
        user_id: &UserId,
    ) -> Result<Option<Rating>, ContentPersistenceError> {
        let state = self.lock_content()?;
        Ok(state
            .ratings
            .iter()
            .find(|rating| rating.restaurant_id == *restaurant_id && rating.user_id == *user_id)
            .copied())
    }

    async fn summary(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<RatingSummary, ContentPersistenceError> {
        let state = self.lock_content()?;
        Ok(RatingSummary::from_scores(
            state
                .ratings
                .iter()
                .filter(|rating| rating.restaurant_id == *restaurant_id)
                .map(|rating| rating.score),
        ))
    }
}

#[async_trait]
impl AuditLog for InMemoryDirectory {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditLogError> {
        self.lock()
            .map_err(AuditLogError::unavailable)?
            .audit
            .push(event.clone());
        trace_audit_event(event);
        Ok(())
    }
}
