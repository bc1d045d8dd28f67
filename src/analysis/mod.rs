//! Page analysis orchestration
//!
//! The [`Analyzer`] parses a document once, runs every extractor against that
//! one parse, then resolves and probes the page's links.

mod result;

pub use crate::parser::{Heading, HeadingLevel};
pub use result::AnalysisResult;

use crate::config::Config;
use crate::links::{classify_and_probe, Prober};
use crate::parser::{
    detect_login, detect_version, extract_headings, extract_links, extract_title, HtmlVersion,
    LoginSignals, ParsedDocument,
};
use crate::LensError;
use std::time::Instant;

/// Facts read from the parsed document before any network access
struct PageFacts {
    title: String,
    html_version: HtmlVersion,
    headings: Vec<Heading>,
    links: Vec<String>,
    login: LoginSignals,
}

impl PageFacts {
    fn extract(document: &ParsedDocument<'_>) -> Self {
        let html = document.html();
        Self {
            title: extract_title(html),
            html_version: detect_version(document.raw()),
            headings: extract_headings(html),
            links: extract_links(html),
            login: detect_login(html),
        }
    }
}

/// Analyzes pages; holds nothing but the probe client, so one instance can
/// serve any number of concurrent calls
#[derive(Debug, Clone)]
pub struct Analyzer {
    prober: Prober,
}

impl Analyzer {
    /// Creates an analyzer from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Analyzer)` - Successfully built analyzer
    /// * `Err(LensError)` - Failed to build the probe HTTP client
    pub fn new(config: &Config) -> Result<Self, LensError> {
        let prober = Prober::new(&config.prober, &config.fetcher.user_agent)?;
        Ok(Self { prober })
    }

    pub fn with_prober(prober: Prober) -> Self {
        Self { prober }
    }

    /// Analyzes raw document bytes
    ///
    /// The bytes are decoded with the declared `charset` (falling back to a
    /// `<meta>` declaration, then UTF-8). Bytes that are malformed for that
    /// encoding cannot be parsed; the result then carries only the error
    /// message.
    pub async fn analyze_bytes(
        &self,
        content: &[u8],
        charset: Option<&str>,
        base_url: &str,
    ) -> AnalysisResult {
        let started = Instant::now();
        let facts = match ParsedDocument::from_bytes(content, charset) {
            Ok(document) => PageFacts::extract(&document),
            Err(e) => {
                tracing::error!("Failed to parse HTML for {}: {}", base_url, e);
                return AnalysisResult::failed(e.to_string());
            }
        };
        tracing::debug!("Parsed document in {:?}", started.elapsed());

        self.complete(facts, base_url).await
    }

    /// Analyzes a document that is already text
    ///
    /// # Example
    ///
    /// ```no_run
    /// use page_lens::{Analyzer, Config};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let analyzer = Analyzer::new(&Config::default())?;
    /// let result = analyzer
    ///     .analyze("<html><title>Hi</title></html>", "https://example.com/")
    ///     .await;
    /// assert_eq!(result.title, "Hi");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn analyze(&self, content: &str, base_url: &str) -> AnalysisResult {
        let started = Instant::now();
        let facts = {
            let document = ParsedDocument::parse(content);
            PageFacts::extract(&document)
        };
        tracing::debug!("Parsed document in {:?}", started.elapsed());

        self.complete(facts, base_url).await
    }

    async fn complete(&self, facts: PageFacts, base_url: &str) -> AnalysisResult {
        let counts = classify_and_probe(&facts.links, base_url, &self.prober).await;

        let result = AnalysisResult {
            title: facts.title,
            html_version: Some(facts.html_version),
            headings: facts.headings,
            links: facts.links,
            internal_links: counts.internal,
            external_links: counts.external,
            inaccessible_links: counts.inaccessible,
            login_detected: facts.login.detected,
            login_indicators: facts.login.indicators,
            error: None,
        };

        tracing::info!(
            "HTML analysis completed: title={:?}, headings={}, links={}, login_detected={}",
            result.title,
            result.headings.len(),
            result.links.len(),
            result.login_detected
        );

        result
    }
}
