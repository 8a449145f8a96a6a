//! Name search across restaurants and menu items.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{DirectorySearch, MenuItemRepository, RestaurantRepository};
use crate::domain::service_support::map_content_persistence_error;
use crate::domain::{Error, SearchResults, SearchTerm};

/// Service implementing [`DirectorySearch`].
#[derive(Clone)]
pub struct SearchService {
    restaurants: Arc<dyn RestaurantRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
}

impl SearchService {
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        menu_items: Arc<dyn MenuItemRepository>,
    ) -> Self {
        Self {
            restaurants,
            menu_items,
        }
    }
}

#[async_trait]
impl DirectorySearch for SearchService {
    async fn search(&self, query: &str) -> Result<SearchResults, Error> {
        let term = SearchTerm::new(query).map_err(|err| {
            warn!("rejected search query without letters or digits");
            Error::from(err)
        })?;
        let restaurants = self
            .restaurants
            .search_by_name(&term)
            .await
            .map_err(map_content_persistence_error)?;
        let menu_items = self
            .menu_items
            .search_by_name(&term)
            .await
            .map_err(map_content_persistence_error)?;
        Ok(SearchResults {
            restaurants,
            menu_items,
        })
    }
}
