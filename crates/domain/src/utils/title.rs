//! Page title cleanup for ad-hoc meeting titles

/// Turn a hosting page's document title into a meeting title.
///
/// Removes the first occurrence of `prefix` (the product name the overlay
/// prepends), trims surrounding whitespace and falls back to `fallback` when
/// nothing is left.
///
/// # Examples
///
/// ```
/// use mia_domain::utils::title::clean_page_title;
///
/// assert_eq!(clean_page_title("Mia - Weekly sync", "Mia - ", "Ad-Hoc Meeting"), "Weekly sync");
/// assert_eq!(clean_page_title("Mia - ", "Mia - ", "Ad-Hoc Meeting"), "Ad-Hoc Meeting");
/// ```
#[must_use]
pub fn clean_page_title(raw: &str, prefix: &str, fallback: &str) -> String {
    let stripped = if prefix.is_empty() { raw.to_string() } else { raw.replacen(prefix, "", 1) };
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
