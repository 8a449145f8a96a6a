//! Authorization guard: the single place where roles are compared.

use super::user::{Role, User, UserId};
use super::Error;

/// Message returned for every denied mutation.
pub const PERMISSION_DENIED: &str = "permission denied";

/// Authenticated identity performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

/// Whether `actor` may mutate an entity owned by `owner_id`.
///
/// # Examples
/// ```
/// use menu_directory::domain::{can_modify, Actor, Role, UserId};
///
/// let owner = UserId::random();
/// assert!(can_modify(&Actor::new(owner, Role::Owner), owner));
/// assert!(!can_modify(&Actor::new(UserId::random(), Role::Owner), owner));
/// assert!(can_modify(&Actor::new(UserId::random(), Role::Admin), owner));
/// ```
pub fn can_modify(actor: &Actor, owner_id: UserId) -> bool {
    actor.is_admin() || actor.id == owner_id
}

/// [`can_modify`] as a `Result`, yielding the generic denial on failure.
pub fn require_modify(actor: &Actor, owner_id: UserId) -> Result<(), Error> {
    if can_modify(actor, owner_id) {
        Ok(())
    } else {
        Err(Error::forbidden(PERMISSION_DENIED))
    }
}

/// Gate for administrator-only operations.
pub fn require_admin(actor: &Actor) -> Result<(), Error> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden(PERMISSION_DENIED))
    }
}

/// Role a user should hold after creating a restaurant.
pub fn role_after_creating_restaurant(current: Role) -> Role {
    match current {
        Role::Public => Role::Owner,
        other => other,
    }
}
