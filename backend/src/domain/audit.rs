//! Append-only audit trail entries.
//!
//! Every authentication attempt, account mutation, content mutation and
//! permission denial produces one [`AuditEvent`].

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    Register,
    Login,
    Logout,
    BootstrapAdmin,
    ChangeRole,
    DeleteUser,
    CreateRestaurant,
    EditRestaurant,
    DeleteRestaurant,
    ReassignOwner,
    CreateMenuItem,
    EditMenuItem,
    DeleteMenuItem,
    RateRestaurant,
    ListUsers,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "account.register",
            Self::Login => "account.login",
            Self::Logout => "account.logout",
            Self::BootstrapAdmin => "account.bootstrap_admin",
            Self::ChangeRole => "account.change_role",
            Self::DeleteUser => "account.delete",
            Self::CreateRestaurant => "restaurant.create",
            Self::EditRestaurant => "restaurant.edit",
            Self::DeleteRestaurant => "restaurant.delete",
            Self::ReassignOwner => "restaurant.reassign_owner",
            Self::CreateMenuItem => "menu_item.create",
            Self::EditMenuItem => "menu_item.edit",
            Self::DeleteMenuItem => "menu_item.delete",
            Self::RateRestaurant => "restaurant.rate",
            Self::ListUsers => "account.list",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditOutcome {
    Success,
    Denied,
    Failed,
}

impl AuditOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Denied => "denied",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single audit record.
///
/// `target` names the affected entity (for example `restaurant:<uuid>` or
/// `user:alice`). `detail` never carries secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub actor: Option<UserId>,
    pub action: AuditAction,
    pub target: String,
    pub outcome: AuditOutcome,
    pub detail: Option<String>,
}

impl AuditEvent {
    pub fn new(
        recorded_at: DateTime<Utc>,
        actor: Option<UserId>,
        action: AuditAction,
        target: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            actor,
            action,
            target: target.into(),
            outcome,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Audit target label for a user.
pub fn user_target(id: impl fmt::Display) -> String {
    format!("user:{id}")
}

/// Audit target label for a restaurant.
pub fn restaurant_target(id: impl fmt::Display) -> String {
    format!("restaurant:{id}")
}

/// Audit target label for a menu item.
pub fn menu_item_target(id: impl fmt::Display) -> String {
    format!("menu_item:{id}")
}
