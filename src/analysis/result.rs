use crate::parser::{Heading, HtmlVersion};
use serde::{Serialize, Serializer};

/// Everything reported about one page
///
/// Serializes to the JSON body returned by the HTTP API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub title: String,

    /// `None` only when the document could not be parsed
    #[serde(rename = "htmlVersion", serialize_with = "serialize_version")]
    pub html_version: Option<HtmlVersion>,

    pub headings: Vec<Heading>,

    /// Distinct raw anchor targets in document order
    pub links: Vec<String>,

    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_links: usize,

    pub login_detected: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub login_indicators: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// A result carrying only an error; every other field keeps its default
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn serialize_version<S: Serializer>(
    version: &Option<HtmlVersion>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(version.map_or("", |v| v.as_str()))
}
