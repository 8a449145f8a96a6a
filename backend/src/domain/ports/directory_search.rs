//! Driving port for name search.

use async_trait::async_trait;

use crate::domain::{Error, SearchResults};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    /// Restaurants and menu items whose names contain the normalised query.
    /// A query with no letters or digits is an `invalid_request` error.
    async fn search(&self, query: &str) -> Result<SearchResults, Error>;
}
