//! Text normalization helpers shared by the extractors

/// Collapses every run of whitespace into a single space and trims the ends
///
/// # Examples
///
/// ```
/// use page_lens::parser::normalize::normalize_space;
///
/// assert_eq!(normalize_space("  Main \n\t Heading  "), "Main Heading");
/// assert_eq!(normalize_space(" \n "), "");
/// ```
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapses whitespace like [`normalize_space`] and lower-cases the result
pub fn normalize_lower(text: &str) -> String {
    normalize_space(text).to_lowercase()
}
