//! Title, heading outline and anchor extraction

use crate::links::is_skippable_href;
use crate::parser::normalize::normalize_space;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;

/// Heading rank, serialized as its tag name (`"h1"` .. `"h6"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// All levels, outermost first
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

/// A heading with whitespace-normalized text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
}

/// Extracts the text of the first `<title>` element
///
/// Returns an empty string when the page has no title.
pub fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts the heading outline
///
/// Levels are walked from `h1` to `h6`, elements within a level in document
/// order. A `(level, text)` pair is reported once; empty headings are skipped.
pub fn extract_headings(document: &Html) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen = HashSet::new();

    for level in HeadingLevel::ALL {
        let Ok(selector) = Selector::parse(level.tag_name()) else {
            continue;
        };

        for element in document.select(&selector) {
            let text = normalize_space(&element.text().collect::<String>());
            if text.is_empty() {
                continue;
            }

            let heading = Heading { level, text };
            if seen.insert(heading.clone()) {
                headings.push(heading);
            }
        }
    }

    headings
}

/// Extracts anchor targets exactly as written, trimmed
///
/// Empty, `javascript:` and fragment-only targets are dropped. Each distinct
/// string is kept once, in order of first appearance.
pub fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if is_skippable_href(href) {
                continue;
            }

            if seen.insert(href.to_string()) {
                links.push(href.to_string());
            }
        }
    }

    links
}
