//! Menu item entity, price formatting and input validation.
//!
//! Names, prices and courses are HTML-escaped; descriptions are stripped to
//! letters and digits.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use super::restaurant::{ensure_length, ContentValidationError, RestaurantId};
use super::sanitize::{escape_markup, strip_to_alphanumeric};

pub const MENU_ITEM_NAME_MAX: usize = 80;
pub const DESCRIPTION_MAX: usize = 250;
pub const PRICE_MAX: usize = 8;
pub const COURSE_MAX: usize = 250;

/// Stable menu item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuItemId(Uuid);

impl MenuItemId {
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

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub course: String,
}

impl MenuItem {
    /// Apply the non-empty fields of `changes`.
    pub fn apply(&mut self, changes: MenuItemChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price.into_string();
        }
        if let Some(course) = changes.course {
            self.course = course;
        }
    }
}

/// Currency symbol prefixed to every stored price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySymbol(String);

impl CurrencySymbol {
    pub fn new(raw: &str) -> Result<Self, ContentValidationError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > 3 || trimmed.chars().any(|c| c.is_ascii_digit() || c == '.') {
            return Err(ContentValidationError::InvalidCurrencySymbol);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencySymbol {
    fn default() -> Self {
        Self("$".to_owned())
    }
}

static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();

fn amount_regex() -> &'static Regex {
    AMOUNT_RE.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d{1,2}))?$")
            .unwrap_or_else(|error| panic!("price regex failed to compile: {error}"))
    })
}

/// Currency-formatted price such as `$7.99`.
///
/// # Examples
/// ```
/// use menu_directory::domain::{CurrencySymbol, Price};
///
/// let price = Price::parse("7.5", &CurrencySymbol::default()).unwrap();
/// assert_eq!(price.as_str(), "$7.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price(String);

impl Price {
    /// Parse an amount, with or without the leading symbol, and format it with
    /// two decimal places.
    pub fn parse(raw: &str, symbol: &CurrencySymbol) -> Result<Self, ContentValidationError> {
        let trimmed = raw.trim();
        let amount = trimmed
            .strip_prefix(symbol.as_str())
            .unwrap_or(trimmed)
            .trim();
        let captures = amount_regex()
            .captures(amount)
            .ok_or(ContentValidationError::InvalidPrice)?;
        let units = captures.get(1).map_or("0", |m| m.as_str());
        let units = match units.trim_start_matches('0') {
            "" => "0",
            significant => significant,
        };
        let cents = captures.get(2).map_or("", |m| m.as_str());
        let formatted = escape_markup(&format!("{}{units}.{cents:0<2}", symbol.as_str()));
        ensure_length(&formatted, "price", PRICE_MAX)?;
        Ok(Self(formatted))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn optional_field(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn escaped_field(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ContentValidationError> {
    let escaped = escape_markup(raw.trim());
    ensure_length(&escaped, field, max)?;
    Ok(escaped)
}

fn description_field(raw: &str) -> Result<String, ContentValidationError> {
    let stripped = strip_to_alphanumeric(raw);
    ensure_length(&stripped, "description", DESCRIPTION_MAX)?;
    Ok(stripped)
}

/// Raw input for a new menu item.
#[derive(Debug, Clone, Default)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub course: Option<String>,
}

/// Menu item fields ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub course: String,
}

impl MenuItemDraft {
    pub fn validate(self, symbol: &CurrencySymbol) -> Result<NewMenuItem, ContentValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContentValidationError::Empty { field: "name" });
        }
        let name = escaped_field(&self.name, "name", MENU_ITEM_NAME_MAX)?;
        let description = description_field(self.description.as_deref().unwrap_or_default())?;
        if self.price.trim().is_empty() {
            return Err(ContentValidationError::Empty { field: "price" });
        }
        let price = Price::parse(&self.price, symbol)?;
        let course = escaped_field(self.course.as_deref().unwrap_or_default(), "course", COURSE_MAX)?;
        Ok(NewMenuItem {
            name,
            description,
            price,
            course,
        })
    }
}

/// Raw edit input; absent or blank fields leave the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct MenuItemEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub course: Option<String>,
}

/// Validated subset of fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub course: Option<String>,
}

impl MenuItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.course.is_none()
    }
}

impl MenuItemEdit {
    pub fn validate(self, symbol: &CurrencySymbol) -> Result<MenuItemChanges, ContentValidationError> {
        Ok(MenuItemChanges {
            name: optional_field(self.name.as_deref())
                .map(|raw| escaped_field(raw, "name", MENU_ITEM_NAME_MAX))
                .transpose()?,
            description: optional_field(self.description.as_deref())
                .map(description_field)
                .transpose()?,
            price: optional_field(self.price.as_deref())
                .map(|raw| Price::parse(raw, symbol))
                .transpose()?,
            course: optional_field(self.course.as_deref())
                .map(|raw| escaped_field(raw, "course", COURSE_MAX))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dollars() -> CurrencySymbol {
        CurrencySymbol::default()
    }

    #[rstest]
    #[case("7.99", "$7.99")]
    #[case("$7.99", "$7.99")]
    #[case(" 12 ", "$12.00")]
    #[case("0.5", "$0.50")]
    #[case("007.10", "$7.10")]
    #[case("9999.99", "$9999.99")]
    fn prices_are_formatted(dollars: CurrencySymbol, #[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Price::parse(raw, &dollars).expect("valid").as_str(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("1.999")]
    #[case("abc")]
    #[case("<b>1</b>")]
    #[case("1.")]
    fn malformed_prices_are_rejected(dollars: CurrencySymbol, #[case] raw: &str) {
        assert_eq!(
            Price::parse(raw, &dollars),
            Err(ContentValidationError::InvalidPrice)
        );
    }

    #[rstest]
    fn oversized_prices_are_rejected(dollars: CurrencySymbol) {
        assert!(matches!(
            Price::parse("123456.00", &dollars),
            Err(ContentValidationError::TooLong { field: "price", .. })
        ));
    }

    #[rstest]
    fn configured_symbol_is_used() {
        let euro = CurrencySymbol::new("€").expect("valid symbol");
        assert_eq!(Price::parse("3", &euro).expect("valid").as_str(), "€3.00");
    }

    #[rstest]
    #[case("")]
    #[case("1")]
    #[case("USD$")]
    fn invalid_symbols_are_rejected(#[case] raw: &str) {
        assert_eq!(
            CurrencySymbol::new(raw),
            Err(ContentValidationError::InvalidCurrencySymbol)
        );
    }

    #[rstest]
    fn drafts_escape_names_and_strip_descriptions(dollars: CurrencySymbol) {
        let item = MenuItemDraft {
            name: "<script>x</script>".into(),
            description: Some("Crispy, golden & hot!".into()),
            price: "4.5".into(),
            course: Some("Main & Side".into()),
        }
        .validate(&dollars)
        .expect("valid draft");

        assert_eq!(item.name, "&lt;script&gt;x&lt;/script&gt;");
        assert_eq!(item.description, "Crispygoldenhot");
        assert_eq!(item.price.as_str(), "$4.50");
        assert_eq!(item.course, "Main &amp; Side");
    }

    #[rstest]
    fn drafts_require_name_and_price(dollars: CurrencySymbol) {
        let missing_name = MenuItemDraft {
            price: "1".into(),
            ..MenuItemDraft::default()
        };
        assert_eq!(
            missing_name.validate(&dollars),
            Err(ContentValidationError::Empty { field: "name" })
        );

        let missing_price = MenuItemDraft {
            name: "Soup".into(),
            ..MenuItemDraft::default()
        };
        assert_eq!(
            missing_price.validate(&dollars),
            Err(ContentValidationError::Empty { field: "price" })
        );
    }

    #[rstest]
    fn edits_skip_blank_fields(dollars: CurrencySymbol) {
        let changes = MenuItemEdit {
            name: Some("  ".into()),
            description: None,
            price: Some("5".into()),
            course: Some(String::new()),
        }
        .validate(&dollars)
        .expect("valid edit");

        assert_eq!(changes.name, None);
        assert_eq!(changes.course, None);
        assert_eq!(changes.price.as_ref().map(Price::as_str), Some("$5.00"));
    }

    #[rstest]
    fn apply_only_overwrites_present_fields(dollars: CurrencySymbol) {
        let mut item = MenuItem {
            id: MenuItemId::random(),
            restaurant_id: RestaurantId::random(),
            name: "Soup".into(),
            description: "Hot".into(),
            price: "$3.00".into(),
            course: "Starter".into(),
        };
        let changes = MenuItemEdit {
            price: Some("3.5".into()),
            ..MenuItemEdit::default()
        }
        .validate(&dollars)
        .expect("valid edit");

        item.apply(changes);

        assert_eq!(item.name, "Soup");
        assert_eq!(item.price, "$3.50");
    }
}
