//! Admin console: role changes, user deletion and forced content changes.

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{AdminCommands, ContentPersistenceError, OwnerReassignment};
use crate::domain::service_support::{
    map_content_persistence_error, map_user_persistence_error, Auditor, DirectoryRepositories,
};
use crate::domain::{
    audit::{restaurant_target, user_target},
    Actor, AuditAction, AuditOutcome, Error, RestaurantId, Role, User, UserId,
};

/// Admin-specific rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("The root administrator account cannot be modified")]
    CannotModifyRootAdmin,
    #[error("The new owner does not exist")]
    InvalidOwner,
}

impl From<AdminError> for Error {
    fn from(value: AdminError) -> Self {
        match value {
            AdminError::CannotModifyRootAdmin => Error::forbidden(value.to_string())
                .with_details(json!({ "code": "cannot_modify_root_admin" })),
            AdminError::InvalidOwner => Error::invalid_request(value.to_string())
                .with_details(json!({ "field": "ownerId", "code": "invalid_owner" })),
        }
    }
}

/// Service implementing [`AdminCommands`].
#[derive(Clone)]
pub struct AdminService {
    repos: DirectoryRepositories,
    auditor: Auditor,
    root_admin: UserId,
}

impl AdminService {
    /// `root_admin` receives the restaurants of deleted users and can never be
    /// demoted or deleted.
    pub fn new(repos: DirectoryRepositories, auditor: Auditor, root_admin: UserId) -> Self {
        Self {
            repos,
            auditor,
            root_admin,
        }
    }

    async fn protect_root_admin(
        &self,
        actor: &Actor,
        target: UserId,
        action: AuditAction,
    ) -> Result<(), Error> {
        if target != self.root_admin {
            return Ok(());
        }
        self.auditor
            .record(
                Some(actor.id),
                action,
                user_target(target),
                AuditOutcome::Denied,
                Some(AdminError::CannotModifyRootAdmin.to_string()),
            )
            .await;
        Err(AdminError::CannotModifyRootAdmin.into())
    }

    async fn load_user(&self, id: UserId) -> Result<User, Error> {
        self.repos
            .users
            .find_by_id(&id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl AdminCommands for AdminService {
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error> {
        self.auditor
            .guard_admin(actor, AuditAction::ListUsers, "users".into())
            .await?;
        self.repos
            .users
            .list_all()
            .await
            .map_err(map_user_persistence_error)
    }

    async fn set_user_role(
        &self,
        actor: &Actor,
        target: UserId,
        role: Role,
    ) -> Result<User, Error> {
        self.auditor
            .guard_admin(actor, AuditAction::ChangeRole, user_target(target))
            .await?;
        self.protect_root_admin(actor, target, AuditAction::ChangeRole)
            .await?;
        let user = self.load_user(target).await?;

        let found = self
            .repos
            .users
            .set_role(&target, role)
            .await
            .map_err(map_user_persistence_error)?;
        if !found {
            return Err(Error::not_found("User not found"));
        }
        info!(user_id = %target, role = %role, "changed user role");
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::ChangeRole,
                user_target(target),
                AuditOutcome::Success,
                Some(format!("{} -> {role}", user.role())),
            )
            .await;
        Ok(user.with_role(role))
    }

    async fn delete_user(&self, actor: &Actor, target: UserId) -> Result<usize, Error> {
        self.auditor
            .guard_admin(actor, AuditAction::DeleteUser, user_target(target))
            .await?;
        self.protect_root_admin(actor, target, AuditAction::DeleteUser)
            .await?;

        let reassigned = self
            .repos
            .users
            .delete_reassigning(&target, &self.root_admin)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        info!(user_id = %target, reassigned, "deleted user");
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::DeleteUser,
                user_target(target),
                AuditOutcome::Success,
                Some(format!("reassigned {reassigned} restaurants to root admin")),
            )
            .await;
        Ok(reassigned)
    }

    async fn reassign_restaurant_owner(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
        new_owner: UserId,
    ) -> Result<OwnerReassignment, Error> {
        let target = restaurant_target(restaurant_id);
        self.auditor
            .guard_admin(actor, AuditAction::ReassignOwner, target.clone())
            .await?;
        let mut restaurant = self
            .repos
            .restaurants
            .find_by_id(&restaurant_id)
            .await
            .map_err(map_content_persistence_error)?
            .ok_or_else(|| Error::not_found("Restaurant not found"))?;

        let owner_exists = self
            .repos
            .users
            .find_by_id(&new_owner)
            .await
            .map_err(map_user_persistence_error)?
            .is_some();
        if !owner_exists {
            return Err(AdminError::InvalidOwner.into());
        }
        if restaurant.owner_id == new_owner {
            warn!(restaurant_id = %restaurant_id, "ownership reassignment requested for current owner");
            return Ok(OwnerReassignment {
                restaurant,
                changed: false,
            });
        }

        let found = self
            .repos
            .restaurants
            .reassign_owner(&restaurant_id, &new_owner)
            .await
            .map_err(|err| match err {
                ContentPersistenceError::MissingReference { .. } => {
                    Error::from(AdminError::InvalidOwner)
                }
                other => map_content_persistence_error(other),
            })?;
        if !found {
            return Err(Error::not_found("Restaurant not found"));
        }
        let previous = restaurant.owner_id;
        restaurant.owner_id = new_owner;
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::ReassignOwner,
                target,
                AuditOutcome::Success,
                Some(format!("{previous} -> {new_owner}")),
            )
            .await;
        Ok(OwnerReassignment {
            restaurant,
            changed: true,
        })
    }

    async fn force_delete_restaurant(
        &self,
        actor: &Actor,
        restaurant_id: RestaurantId,
    ) -> Result<(), Error> {
        let target = restaurant_target(restaurant_id);
        self.auditor
            .guard_admin(actor, AuditAction::DeleteRestaurant, target.clone())
            .await?;
        let found = self
            .repos
            .restaurants
            .delete_cascading(&restaurant_id)
            .await
            .map_err(map_content_persistence_error)?;
        if !found {
            return Err(Error::not_found("Restaurant not found"));
        }
        self.auditor
            .record(
                Some(actor.id),
                AuditAction::DeleteRestaurant,
                target,
                AuditOutcome::Success,
                Some("forced by admin".into()),
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{
        MockAuditLog, MockMenuItemRepository, MockRatingRepository, MockRestaurantRepository,
        MockUserRepository,
    };
    use crate::domain::ErrorCode;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn service(users: MockUserRepository, root_admin: UserId) -> AdminService {
        let mut log = MockAuditLog::new();
        log.expect_record().returning(|_| Ok(()));
        let repos = DirectoryRepositories {
            users: Arc::new(users),
            restaurants: Arc::new(MockRestaurantRepository::new()),
            menu_items: Arc::new(MockMenuItemRepository::new()),
            ratings: Arc::new(MockRatingRepository::new()),
        };
        AdminService::new(
            repos,
            Auditor::new(Arc::new(log), Arc::new(DefaultClock)),
            root_admin,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn root_admin_cannot_be_deleted() {
        let root = UserId::random();
        let mut users = MockUserRepository::new();
        users.expect_delete_reassigning().never();
        let service = service(users, root);

        let admin = Actor::new(UserId::random(), Role::Admin);
        let err = service.delete_user(&admin, root).await.expect_err("protected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Public)]
    #[case(Role::Owner)]
    #[tokio::test]
    async fn non_admins_cannot_list_users(#[case] role: Role) {
        let mut users = MockUserRepository::new();
        users.expect_list_all().never();
        let service = service(users, UserId::random());

        let err = service
            .list_users(&Actor::new(UserId::random(), role))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_delete_reassigning().returning(|_, _| Ok(None));
        let service = service(users, UserId::random());

        let admin = Actor::new(UserId::random(), Role::Admin);
        let err = service
            .delete_user(&admin, UserId::random())
            .await
            .expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
