use crate::parser::normalize::normalize_lower;
use scraper::{Html, Selector};

/// Indicator reported when the page has a password field
pub const PASSWORD_INPUT_INDICATOR: &str = "password_input";

/// Indicator reported when the page text mentions logging in
pub const PAGE_TEXT_INDICATOR: &str = "page_text_contains_login";

/// Login heuristic outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSignals {
    pub detected: bool,
    /// Distinct indicators in the order they fired
    pub indicators: Vec<String>,
}

impl LoginSignals {
    fn record(&mut self, indicator: &str) {
        self.detected = true;
        if !self.indicators.iter().any(|existing| existing == indicator) {
            self.indicators.push(indicator.to_string());
        }
    }
}

/// Looks for signs that the page is a login page
///
/// Both checks always run, so a page can report both indicators:
/// - a password `<input>` anywhere in the document
/// - `login` or `sign in` in the whitespace-collapsed, lower-cased page text
pub fn detect_login(document: &Html) -> LoginSignals {
    let mut signals = LoginSignals::default();

    if let Ok(password_selector) = Selector::parse(r#"input[type="password"]"#) {
        if document.select(&password_selector).next().is_some() {
            signals.record(PASSWORD_INPUT_INDICATOR);
        }
    }

    let page_text = normalize_lower(&document.root_element().text().collect::<String>());
    if page_text.contains("login") || page_text.contains("sign in") {
        signals.record(PAGE_TEXT_INDICATOR);
    }

    signals
}
