use crate::parser::encoding::decode_document;
use crate::ParseError;
use scraper::Html;
use std::borrow::Cow;

/// A page parsed once and shared read-only by every extractor
///
/// Keeps the raw markup next to the tree because the version detector works on
/// tokens rather than on the tree.
pub struct ParsedDocument<'a> {
    raw: Cow<'a, str>,
    html: Html,
}

impl<'a> ParsedDocument<'a> {
    /// Parses markup that is already known to be text
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw: Cow::Borrowed(raw),
            html: Html::parse_document(raw),
        }
    }

    /// Decodes and parses raw document bytes
    ///
    /// # Arguments
    ///
    /// * `bytes` - The response body
    /// * `charset` - The charset label declared by the response, if any
    ///
    /// # Returns
    ///
    /// * `Ok(ParsedDocument)` - The bytes decoded and were parsed
    /// * `Err(ParseError)` - The bytes are malformed for their encoding
    pub fn from_bytes(bytes: &'a [u8], charset: Option<&str>) -> Result<Self, ParseError> {
        let raw = decode_document(bytes, charset)?;
        let html = Html::parse_document(&raw);
        Ok(Self { raw, html })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}
