//! Content store: restaurants, menu items and ratings.
//!
//! Every mutation loads the parent restaurant first, so ownership is always
//! checked against the stored owner rather than anything the caller sent.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ContentCommands, ContentQueries, Edited, Menu, MenuItemRepository, RatingRepository,
    RestaurantDetail, RestaurantRepository,
};
use crate::domain::service_support::{
    map_content_persistence_error, Auditor, DirectoryRepositories,
};
use crate::domain::{
    audit::{menu_item_target, restaurant_target},
    Actor, AuditAction, AuditOutcome, CurrencySymbol, Error, MenuItem, MenuItemDraft,
    MenuItemEdit, MenuItemId, Rating, RatingError, Restaurant, RestaurantDraft, RestaurantId,
    RestaurantRename, Role, Score,
};

const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
const MENU_ITEM_NOT_FOUND: &str = "Menu item not found";

/// Service implementing [`ContentCommands`] and [`ContentQueries`].
#[derive(Clone)]
pub struct ContentService {
    repos: DirectoryRepositories,
    auditor: Auditor,
    currency: CurrencySymbol,
}

impl ContentService {
    pub fn new(repos: DirectoryRepositories, auditor: Auditor, currency: CurrencySymbol) -> Self {
        Self {
            repos,
            auditor,
            currency,
        }
    }

    fn restaurants(&self) -> &dyn RestaurantRepository {
        self.repos.restaurants.as_ref()
    }

    fn menu_items(&self) -> &dyn MenuItemRepository {
        self.repos.menu_items.as_ref()
    }

    fn ratings(&self) -> &dyn RatingRepository {
        self.repos.ratings.as_ref()
    }

    async fn load_restaurant(&self, id: RestaurantId) -> Result<Restaurant, Error> {
        self.restaurants()
            .find_by_id(&id)
            .await
            .map_err(map_content_persistence_error)?
            .ok_or_else(|| Error::not_found(RESTAURANT_NOT_FOUND))
    }

    async fn load_menu_item(
        &self,
        restaurant_id: RestaurantId,
        id: MenuItemId,
    ) -> Result<MenuItem, Error> {
        self.menu_items()
            .find(&restaurant_id, &id)
            .await
            .map_err(map_content_persistence_error)?
            .ok_or_else(|| Error::not_found(MENU_ITEM_NOT_FOUND))
    }

    /// Load a restaurant and check that `actor` may modify it.
    async fn authorized_restaurant(
        &self,
        actor: &Actor,
        id: RestaurantId,
        action: AuditAction,
    ) -> Result<Restaurant, Error> {
        let restaurant = self.load_restaurant(id).await?;
        self.auditor
            .guard_modify(actor, restaurant.owner_id, action, restaurant_target(id))
            .await?;
        Ok(restaurant)
    }
}

#[async_trait]
impl ContentCommands for ContentService {
    async fn create_restaurant(&self, actor: &Actor, name: &str) -> Result<Restaurant, Error> {
        let draft = RestaurantDraft::new(name)?;
        let restaurant = Restaurant {
            id: RestaurantId::random(),
            name: draft.name().to_owned(),
            owner_id: actor.id,
        };
        self.restaurants()
            .insert_promoting_owner(&restaurant)
            .await
            .map_err(map_content_persistence_error)?;

        let detail = (actor.role == Role::Public).then(|| "owner promoted from public".to_owned());
        info!(restaurant_id = %restaurant.id, owner_id = %actor.id, "created restaurant");
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::CreateRestaurant,
                restaurant_target(restaurant.id),
                AuditOutcome::Success,
                detail,
            )
            .await;
        Ok(restaurant)
    }

    async fn edit_restaurant(
        &self,
        actor: &Actor,
        id: RestaurantId,
        new_name: Option<String>,
    ) -> Result<Edited<Restaurant>, Error> {
        let mut restaurant = self
            .authorized_restaurant(actor, id, AuditAction::EditRestaurant)
            .await?;
        let rename = RestaurantRename::new(new_name.as_deref())?;
        let Some(name) = rename.name() else {
            return Ok(Edited {
                value: restaurant,
                changed: false,
            });
        };

        let found = self
            .restaurants()
            .rename(&id, name)
            .await
            .map_err(map_content_persistence_error)?;
        if !found {
            return Err(Error::not_found(RESTAURANT_NOT_FOUND));
        }
        restaurant.name = name.to_owned();
        self.auditor
            .success(Some(actor.id), AuditAction::EditRestaurant, restaurant_target(id))
            .await;
        Ok(Edited {
            value: restaurant,
            changed: true,
        })
    }

    async fn delete_restaurant(&self, actor: &Actor, id: RestaurantId) -> Result<(), Error> {
        self.authorized_restaurant(actor, id, AuditAction::DeleteRestaurant)
            .await?;
        let found = self
            .restaurants()
            .delete_cascading(&id)
            .await
            .map_err(map_content_persistence_error)?;
        if !found {
            return Err(Error::not_found(RESTAURANT_NOT_FOUND));
        }
        info!(restaurant_id = %id, "deleted restaurant");
        self.auditor
            .success(Some(actor.id), AuditAction::DeleteRestaurant, restaurant_target(id))
            .await;
        Ok(())
    }

    async fn create_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        draft: MenuItemDraft,
    ) -> Result<MenuItem, Error> {
        self.authorized_restaurant(actor, restaurant_id, AuditAction::CreateMenuItem)
            .await?;
        let fields = draft.validate(&self.currency)?;
        let item = MenuItem {
            id: MenuItemId::random(),
            restaurant_id,
            name: fields.name,
            description: fields.description,
            price: fields.price.into_string(),
            course: fields.course,
        };
        self.menu_items()
            .insert(&item)
            .await
            .map_err(map_content_persistence_error)?;
        self.auditor
            .success(Some(actor.id), AuditAction::CreateMenuItem, menu_item_target(item.id))
            .await;
        Ok(item)
    }

    async fn edit_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        id: MenuItemId,
        edit: MenuItemEdit,
    ) -> Result<Edited<MenuItem>, Error> {
        self.authorized_restaurant(actor, restaurant_id, AuditAction::EditMenuItem)
            .await?;
        let mut item = self.load_menu_item(restaurant_id, id).await?;
        let changes = edit.validate(&self.currency)?;
        if changes.is_empty() {
            return Ok(Edited {
                value: item,
                changed: false,
            });
        }

        item.apply(changes);
        let found = self
            .menu_items()
            .update(&item)
            .await
            .map_err(map_content_persistence_error)?;
        if !found {
            return Err(Error::not_found(MENU_ITEM_NOT_FOUND));
        }
        self.auditor
            .success(Some(actor.id), AuditAction::EditMenuItem, menu_item_target(id))
            .await;
        Ok(Edited {
            value: item,
            changed: true,
        })
    }

    async fn delete_menu_item(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        id: MenuItemId,
    ) -> Result<(), Error> {
        self.authorized_restaurant(actor, restaurant_id, AuditAction::DeleteMenuItem)
            .await?;
        let found = self
            .menu_items()
            .delete(&restaurant_id, &id)
            .await
            .map_err(map_content_persistence_error)?;
        if !found {
            return Err(Error::not_found(MENU_ITEM_NOT_FOUND));
        }
        self.auditor
            .success(Some(actor.id), AuditAction::DeleteMenuItem, menu_item_target(id))
            .await;
        Ok(())
    }

    async fn rate_restaurant(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        score: i64,
    ) -> Result<Rating, Error> {
        let restaurant = self.load_restaurant(restaurant_id).await?;
        if restaurant.owner_id == actor.id {
            self.auditor
                .record(
                    Some(actor.id),
                    AuditAction::RateRestaurant,
                    restaurant_target(restaurant_id),
                    AuditOutcome::Denied,
                    Some(RatingError::OwnerCannotRate.to_string()),
                )
                .await;
            return Err(RatingError::OwnerCannotRate.into());
        }

        let rating = Rating {
            restaurant_id,
            user_id: actor.id,
            score: Score::new(score)?,
        };
        self.ratings()
            .upsert(&rating)
            .await
            .map_err(map_content_persistence_error)?;
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::RateRestaurant,
                restaurant_target(restaurant_id),
                AuditOutcome::Success,
                Some(format!("score={}", rating.score.value())),
            )
            .await;
        Ok(rating)
    }
}

#[async_trait]
impl ContentQueries for ContentService {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, Error> {
        self.restaurants()
            .list_all()
            .await
            .map_err(map_content_persistence_error)
    }

    async fn get_restaurant(&self, id: RestaurantId) -> Result<RestaurantDetail, Error> {
        let restaurant = self.load_restaurant(id).await?;
        let rating = self
            .ratings()
            .summary(&id)
            .await
            .map_err(map_content_persistence_error)?;
        Ok(RestaurantDetail { restaurant, rating })
    }

    async fn list_menu(&self, restaurant_id: RestaurantId) -> Result<Menu, Error> {
        let restaurant = self.load_restaurant(restaurant_id).await?;
        let items = self
            .menu_items()
            .list_for_restaurant(&restaurant_id)
            .await
            .map_err(map_content_persistence_error)?;
        Ok(Menu { restaurant, items })
    }

    async fn get_menu_item(
        &self,
        restaurant_id: RestaurantId,
        id: MenuItemId,
    ) -> Result<MenuItem, Error> {
        self.load_restaurant(restaurant_id).await?;
        self.load_menu_item(restaurant_id, id).await
    }
}

#[cfg(test)]
mod tests {
    //! Mock-port coverage for ordering guarantees; behavioural flows live in
    //! `tests/content.rs`.
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{
        ContentPersistenceError, MockAuditLog, MockMenuItemRepository, MockRatingRepository,
        MockRestaurantRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, UserId};
    use mockable::DefaultClock;
    use rstest::rstest;

    struct Mocks {
        restaurants: MockRestaurantRepository,
        menu_items: MockMenuItemRepository,
        ratings: MockRatingRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                restaurants: MockRestaurantRepository::new(),
                menu_items: MockMenuItemRepository::new(),
                ratings: MockRatingRepository::new(),
            }
        }

        fn into_service(self) -> ContentService {
            let mut log = MockAuditLog::new();
            log.expect_record().returning(|_| Ok(()));
            let repos = DirectoryRepositories {
                users: Arc::new(MockUserRepository::new()),
                restaurants: Arc::new(self.restaurants),
                menu_items: Arc::new(self.menu_items),
                ratings: Arc::new(self.ratings),
            };
            ContentService::new(
                repos,
                Auditor::new(Arc::new(log), Arc::new(DefaultClock)),
                CurrencySymbol::default(),
            )
        }
    }

    fn owned_by(owner_id: UserId) -> Restaurant {
        Restaurant {
            id: RestaurantId::random(),
            name: "Joes".into(),
            owner_id,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn denied_edit_never_touches_storage() {
        let restaurant = owned_by(UserId::random());
        let id = restaurant.id;
        let mut mocks = Mocks::new();
        mocks
            .restaurants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(restaurant.clone())));
        mocks.restaurants.expect_rename().never();
        let service = mocks.into_service();

        let intruder = Actor::new(UserId::random(), Role::Owner);
        let err = service
            .edit_restaurant(&intruder, id, Some("Mine".into()))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn owner_rating_is_rejected_before_score_validation() {
        let owner = UserId::random();
        let restaurant = owned_by(owner);
        let id = restaurant.id;
        let mut mocks = Mocks::new();
        mocks
            .restaurants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(restaurant.clone())));
        mocks.ratings.expect_upsert().never();
        let service = mocks.into_service();

        let err = service
            .rate_restaurant(&Actor::new(owner, Role::Owner), id, 42)
            .await
            .expect_err("owner cannot rate");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn storage_outage_surfaces_as_service_unavailable() {
        let mut mocks = Mocks::new();
        mocks
            .restaurants
            .expect_list_all()
            .returning(|| Err(ContentPersistenceError::connection("refused")));
        let service = mocks.into_service();

        let err = service.list_restaurants().await.expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_parent_hides_menu_item() {
        let mut mocks = Mocks::new();
        mocks.restaurants.expect_find_by_id().returning(|_| Ok(None));
        mocks.menu_items.expect_find().never();
        let service = mocks.into_service();

        let err = service
            .get_menu_item(RestaurantId::random(), MenuItemId::random())
            .await
            .expect_err("missing restaurant");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
