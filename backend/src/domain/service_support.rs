//! Helpers shared by the domain services: port error mapping, the audit
//! recorder and the repository bundle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::error;

use crate::domain::ports::{
    AuditLog, ContentPersistenceError, MenuItemRepository, PasswordHashError, RatingRepository,
    RestaurantRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    can_modify, Actor, AuditAction, AuditEvent, AuditOutcome, Error, UserId, PERMISSION_DENIED,
};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => Error::conflict("Username is already taken"),
    }
}

pub(crate) fn map_content_persistence_error(error: ContentPersistenceError) -> Error {
    match error {
        ContentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("content repository unavailable: {message}"))
        }
        ContentPersistenceError::Query { message } => {
            Error::internal(format!("content repository error: {message}"))
        }
        ContentPersistenceError::MissingReference { message } => {
            Error::not_found(format!("{message} not found"))
        }
    }
}

pub(crate) fn map_password_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("password processing failed")
}

/// Every storage port the services need, shared behind `Arc`s.
#[derive(Clone)]
pub struct DirectoryRepositories {
    pub users: Arc<dyn UserRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub menu_items: Arc<dyn MenuItemRepository>,
    pub ratings: Arc<dyn RatingRepository>,
}

/// Stamps and appends audit events.
///
/// A failing sink is logged at `error` level and otherwise ignored so that
/// the audited operation keeps its outcome.
#[derive(Clone)]
pub struct Auditor {
    log: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl Auditor {
    pub fn new(log: Arc<dyn AuditLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub async fn record(
        &self,
        actor: Option<UserId>,
        action: AuditAction,
        target: impl Into<String>,
        outcome: AuditOutcome,
        detail: Option<String>,
    ) {
        let mut event = AuditEvent::new(self.now(), actor, action, target, outcome);
        event.detail = detail;
        if let Err(err) = self.log.record(&event).await {
            error!(
                target: "audit",
                error = %err,
                action = %event.action,
                outcome = %event.outcome,
                "failed to record audit event"
            );
        }
    }

    pub async fn success(&self, actor: Option<UserId>, action: AuditAction, target: String) {
        self.record(actor, action, target, AuditOutcome::Success, None)
            .await;
    }

    /// Record a denial and produce the generic permission error.
    pub async fn deny(&self, actor: &Actor, action: AuditAction, target: String) -> Error {
        self.record(Some(actor.id), action, target, AuditOutcome::Denied, None)
            .await;
        Error::forbidden(PERMISSION_DENIED)
    }

    /// Authorize a mutation of an entity owned by `owner_id`, auditing a
    /// denial.
    pub async fn guard_modify(
        &self,
        actor: &Actor,
        owner_id: UserId,
        action: AuditAction,
        target: String,
    ) -> Result<(), Error> {
        if can_modify(actor, owner_id) {
            return Ok(());
        }
        Err(self.deny(actor, action, target).await)
    }

    /// Authorize an admin-only operation, auditing a denial.
    pub async fn guard_admin(
        &self,
        actor: &Actor,
        action: AuditAction,
        target: String,
    ) -> Result<(), Error> {
        match crate::domain::require_admin(actor) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.deny(actor, action, target).await),
        }
    }
}
