//! Helpers shared by the integration suites.

#![allow(dead_code)]

use futures::executor::block_on;
use menu_directory::domain::ports::AccountCommands;
use menu_directory::domain::{Actor, RegistrationForm, Role, User, UserId};
use menu_directory::test_support::DirectoryHarness;

pub const PASSWORD: &str = "Abc12345!";

/// Start a fresh harness; each call gets its own store.
pub fn harness() -> DirectoryHarness {
    block_on(DirectoryHarness::start()).expect("harness starts")
}

/// Register `username` with [`PASSWORD`] and return its id.
pub fn register(harness: &DirectoryHarness, username: &str) -> UserId {
    block_on(
        harness
            .accounts
            .register(RegistrationForm::new(username, PASSWORD, PASSWORD)),
    )
    .unwrap_or_else(|err| panic!("register {username}: {err}"))
}

/// Load the stored user so role changes are observed.
pub fn user(harness: &DirectoryHarness, id: UserId) -> User {
    block_on(harness.accounts.resolve_user(&id))
        .expect("user lookup")
        .expect("user exists")
}

/// Actor carrying the user's current role.
pub fn actor(harness: &DirectoryHarness, id: UserId) -> Actor {
    Actor::from(&user(harness, id))
}

pub fn root(harness: &DirectoryHarness) -> Actor {
    Actor::new(harness.root_admin, Role::Admin)
}
