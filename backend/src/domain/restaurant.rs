//! Restaurant entity and its input validation.

use std::fmt;

use serde_json::json;
use uuid::Uuid;

use super::sanitize::{escape_markup, strip_to_alphanumeric};
use super::user::UserId;
use super::Error;

/// Maximum stored length of a restaurant name.
pub const RESTAURANT_NAME_MAX: usize = 250;

/// Validation failures for restaurant and menu item input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("price must be a non-negative amount with at most two decimal places")]
    InvalidPrice,
    #[error("currency symbol must be one to three non-numeric characters")]
    InvalidCurrencySymbol,
}

impl ContentValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } => field,
            Self::InvalidPrice => "price",
            Self::InvalidCurrencySymbol => "currencySymbol",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty",
            Self::TooLong { .. } => "too_long",
            Self::InvalidPrice => "invalid_price",
            Self::InvalidCurrencySymbol => "invalid_currency_symbol",
        }
    }
}

impl From<ContentValidationError> for Error {
    fn from(value: ContentValidationError) -> Self {
        let details = json!({ "field": value.field(), "code": value.code() });
        Error::invalid_request(value.to_string()).with_details(details)
    }
}

pub(crate) fn ensure_length(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ContentValidationError> {
    if value.chars().count() > max {
        return Err(ContentValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Stable restaurant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub owner_id: UserId,
}

/// Name accepted for a new restaurant: ASCII letters and digits only.
///
/// # Examples
/// ```
/// use menu_directory::domain::RestaurantDraft;
///
/// let draft = RestaurantDraft::new("Joe's").unwrap();
/// assert_eq!(draft.name(), "Joes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantDraft {
    name: String,
}

impl RestaurantDraft {
    pub fn new(raw: &str) -> Result<Self, ContentValidationError> {
        let name = strip_to_alphanumeric(raw);
        if name.is_empty() {
            return Err(ContentValidationError::Empty { field: "name" });
        }
        ensure_length(&name, "name", RESTAURANT_NAME_MAX)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Rename request: `None` when the submitted name was absent or blank, which
/// leaves the restaurant unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRename {
    name: Option<String>,
}

impl RestaurantRename {
    pub fn new(raw: Option<&str>) -> Result<Self, ContentValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self { name: None });
        };
        let name = escape_markup(trimmed);
        ensure_length(&name, "name", RESTAURANT_NAME_MAX)?;
        Ok(Self { name: Some(name) })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
