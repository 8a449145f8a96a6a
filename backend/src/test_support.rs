//! Test utilities for the menu directory crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! with the `test-support` feature.

mod clock;
mod directory;

pub use clock::MutableClock;
pub use directory::{DirectoryHarness, ROOT_ADMIN_PASSWORD, ROOT_ADMIN_USERNAME};
