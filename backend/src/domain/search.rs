//! Search input and results.

use serde_json::json;

use super::menu_item::MenuItem;
use super::restaurant::Restaurant;
use super::sanitize::{search_key, strip_to_alphanumeric};
use super::Error;

/// Raised when a query has no searchable characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please enter letters or digits to search for")]
pub struct BlankSearchTerm;

impl From<BlankSearchTerm> for Error {
    fn from(value: BlankSearchTerm) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": "q", "code": "blank_query" }))
    }
}

/// Normalised, non-empty search term: lowercase ASCII letters and digits.
///
/// Terms are compared against [`search_key`] of a stored name, never against
/// the escaped name itself.
///
/// # Examples
/// ```
/// use menu_directory::domain::SearchTerm;
///
/// assert_eq!(SearchTerm::new("joe's").unwrap().as_str(), "joes");
/// assert!(SearchTerm::new(" !? ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Result<Self, BlankSearchTerm> {
        let normalized = strip_to_alphanumeric(raw).to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(BlankSearchTerm);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Containment check against a stored (escaped) name, used by
    /// in-process adapters.
    pub fn matches(&self, stored_name: &str) -> bool {
        search_key(stored_name).contains(&self.0)
    }
}

/// Restaurants and menu items whose names contain the term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub restaurants: Vec<Restaurant>,
    pub menu_items: Vec<MenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PIZZA", "Pizza Palace", true)]
    #[case("za pa", "Pizza Palace", true)]
    #[case("amp", "Fish &amp; Chips", false)]
    #[case("lt", "&lt;b&gt;Soup&lt;/b&gt;", false)]
    #[case("fish chips", "Fish &amp; Chips", true)]
    #[case("zapa", "PizzaPalace", true)]
    #[case("soup", "Pizza Palace", false)]
    fn matching_ignores_case_punctuation_and_escapes(
        #[case] raw: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let term = SearchTerm::new(raw).expect("non-blank");
        assert_eq!(term.matches(candidate), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("%_'")]
    fn blank_terms_are_rejected(#[case] raw: &str) {
        assert_eq!(SearchTerm::new(raw), Err(BlankSearchTerm));
    }
}
