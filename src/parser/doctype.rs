//! Document version detection
//!
//! The version is read from the first doctype token produced by the html5ever
//! tokenizer. The tree builder is not involved, so a doctype is found even when
//! it does not lead the document.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Doctype, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use serde::{Serialize, Serializer};
use std::fmt;

/// Markup version label derived from the doctype declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlVersion {
    Html5,
    Xhtml,
    Html401,
    Html401Transitional,
    Html401Strict,
    Unknown,
}

impl HtmlVersion {
    /// Returns the label reported to clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html5 => "HTML5",
            Self::Xhtml => "XHTML",
            Self::Html401 => "HTML 4.01",
            Self::Html401Transitional => "HTML 4.01 Transitional",
            Self::Html401Strict => "HTML 4.01 Strict",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HtmlVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Token sink that keeps the first doctype and ignores everything else
#[derive(Default)]
struct DoctypeSink {
    doctype: Option<Doctype>,
}

impl TokenSink for DoctypeSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if let Token::DoctypeToken(doctype) = token {
            if self.doctype.is_none() {
                self.doctype = Some(doctype);
            }
        }
        TokenSinkResult::Continue
    }
}

/// Detects the markup version of a raw HTML document
///
/// # Examples
///
/// ```
/// use page_lens::parser::{detect_version, HtmlVersion};
///
/// assert_eq!(detect_version("<!DOCTYPE html><html></html>"), HtmlVersion::Html5);
/// assert_eq!(detect_version("<html></html>"), HtmlVersion::Unknown);
/// ```
pub fn detect_version(markup: &str) -> HtmlVersion {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(markup));

    let mut tokenizer = Tokenizer::new(DoctypeSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    match &tokenizer.sink.doctype {
        Some(doctype) => {
            let identifiers: Vec<&str> = [&doctype.public_id, &doctype.system_id]
                .into_iter()
                .flatten()
                .map(|id| &**id)
                .collect();
            classify_doctype(doctype.name.as_deref().unwrap_or(""), &identifiers)
        }
        None => HtmlVersion::Unknown,
    }
}

/// Classifies a doctype from its name and its public/system identifiers
///
/// Rules are applied in order and the first match wins. `4.01` is tested
/// before `transitional` and `strict`, so a 4.01 Transitional doctype is
/// reported as plain `HTML 4.01`. Substring tests are case-sensitive.
pub fn classify_doctype(name: &str, identifiers: &[&str]) -> HtmlVersion {
    if name.eq_ignore_ascii_case("html") && identifiers.is_empty() {
        return HtmlVersion::Html5;
    }

    let mut text = name.to_string();
    for identifier in identifiers {
        text.push(' ');
        text.push_str(identifier);
    }

    if text.contains("xhtml") {
        HtmlVersion::Xhtml
    } else if text.contains("4.01") {
        HtmlVersion::Html401
    } else if text.contains("transitional") {
        HtmlVersion::Html401Transitional
    } else if text.contains("strict") {
        HtmlVersion::Html401Strict
    } else {
        HtmlVersion::Unknown
    }
}
