//! Character decoding for downloaded documents
//!
//! The encoding is picked in this order:
//! 1. A byte order mark
//! 2. The charset label from the response `Content-Type`
//! 3. A `charset=` declaration in the first 1024 bytes of markup
//! 4. UTF-8

use crate::ParseError;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

/// How far into the document a `<meta>` charset declaration is looked for
const SNIFF_LIMIT: usize = 1024;

/// Picks the encoding for a document and the length of its byte order mark
pub fn detect_encoding(bytes: &[u8], charset: Option<&str>) -> (&'static Encoding, usize) {
    if let Some(found) = Encoding::for_bom(bytes) {
        return found;
    }

    let declared = charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| sniff_meta_charset(bytes));

    (declared.unwrap_or(UTF_8), 0)
}

/// Decodes document bytes into text
///
/// # Arguments
///
/// * `bytes` - The raw response body
/// * `charset` - The charset label the response declared, if any
///
/// # Returns
///
/// * `Ok(Cow<str>)` - The decoded text (borrowed when the bytes are already UTF-8)
/// * `Err(ParseError)` - The bytes are malformed for the chosen encoding
pub fn decode_document<'a>(
    bytes: &'a [u8],
    charset: Option<&str>,
) -> Result<Cow<'a, str>, ParseError> {
    let (encoding, bom_len) = detect_encoding(bytes, charset);

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or(ParseError::InvalidEncoding(encoding.name()))
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("<meta")?;
    let declaration = &head[start..];
    let value = &declaration[declaration.find("charset=")? + "charset=".len()..];
    let label = value
        .trim_start_matches(|c: char| c == '"' || c == '\'')
        .split(|c: char| matches!(c, '"' | '\'' | ';' | '>' | '/') || c.is_whitespace())
        .next()?;

    Encoding::for_label(label.as_bytes())
}
