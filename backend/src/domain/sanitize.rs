//! String filters applied to untrusted input before storage.
//!
//! Two policies exist on purpose: names, prices and courses keep their
//! characters but have markup escaped, while descriptions and search terms
//! are reduced to ASCII letters and digits.

/// Escape HTML-significant characters.
///
/// # Examples
/// ```
/// use menu_directory::domain::sanitize::escape_markup;
///
/// assert_eq!(
///     escape_markup("<script>alert('x')</script>"),
///     "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
/// );
/// ```
pub fn escape_markup(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Drop every character outside `[A-Za-z0-9]`.
///
/// # Examples
/// ```
/// use menu_directory::domain::sanitize::strip_to_alphanumeric;
///
/// assert_eq!(strip_to_alphanumeric("Joe's"), "Joes");
/// ```
pub fn strip_to_alphanumeric(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Reverse [`escape_markup`]. Other entities are left as they are.
pub fn unescape_markup(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Key that name searches compare against: the name as the user typed it,
/// reduced to lowercase ASCII letters and digits.
///
/// Escaping is undone first so entity text such as `amp` never matches.
///
/// # Examples
/// ```
/// use menu_directory::domain::sanitize::{escape_markup, search_key};
///
/// assert_eq!(search_key(&escape_markup("Fish & Chips")), "fishchips");
/// ```
pub fn search_key(stored_name: &str) -> String {
    strip_to_alphanumeric(&unescape_markup(stored_name)).to_ascii_lowercase()
}
