//! HTML parsing and page fact extraction
//!
//! This module turns raw markup into the facts reported for a page:
//! - Document version from the doctype declaration
//! - Title, heading outline and raw anchor targets
//! - Login page indicators

mod doctype;
mod document;
pub mod encoding;
mod login;
pub mod normalize;
mod structure;

pub use doctype::{classify_doctype, detect_version, HtmlVersion};
pub use document::ParsedDocument;
pub use login::{detect_login, LoginSignals, PAGE_TEXT_INDICATOR, PASSWORD_INPUT_INDICATOR};
pub use structure::{extract_headings, extract_links, extract_title, Heading, HeadingLevel};
