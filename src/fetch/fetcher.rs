//! HTTP fetcher implementation
//!
//! This module handles downloading the page to analyze, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - A single GET request per page, no retries
//! - Status and transport error classification

use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

/// A downloaded page body together with the charset its response declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub body: Vec<u8>,
    /// Charset label from the `Content-Type` header, if present
    pub charset: Option<String>,
}

/// Builds the HTTP client used to download pages
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use page_lens::config::FetcherConfig;
/// use page_lens::fetch::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads a page and returns its body with the declared charset
///
/// # Request Flow
///
/// 1. Validate the URL
/// 2. Send one GET request (redirects are followed by the client)
/// 3. Reject any final status outside `[200, 400)`
/// 4. Read the whole body and the `Content-Type` charset
///
/// | Condition | Result |
/// |-----------|--------|
/// | Unparsable URL | `FetchError::InvalidUrl` |
/// | Timeout, DNS, connection refused | `FetchError::Request` |
/// | Status < 200 or >= 400 | `FetchError::Status` |
/// | Body read failure | `FetchError::Body` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The page URL
pub async fn fetch_document(client: &Client, url: &str) -> Result<FetchedDocument, FetchError> {
    tracing::info!("Fetching URL: {}", url);

    let target = Url::parse(url).map_err(|source| {
        tracing::error!("Invalid URL {}: {}", url, source);
        FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        }
    })?;

    let response = client.get(target).send().await.map_err(|e| {
        if e.is_timeout() {
            tracing::error!("Request timeout for {}", url);
        } else {
            tracing::error!("HTTP request failed for {}: {}", url, e);
        }
        FetchError::Request(e)
    })?;

    let status = response.status().as_u16();
    if !(200..400).contains(&status) {
        tracing::warn!("Unexpected HTTP status for {}: {}", url, status);
        return Err(FetchError::Status(status));
    }

    let charset = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset_from_content_type)
        .map(str::to_string);

    let body = response.bytes().await.map_err(|e| {
        tracing::error!("Failed to read body for {}: {}", url, e);
        FetchError::Body(e)
    })?;

    tracing::info!("Fetch successful: {} ({} bytes)", url, body.len());
    Ok(FetchedDocument {
        body: body.to_vec(),
        charset,
    })
}

/// Extracts the `charset` parameter from a `Content-Type` value
fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    })
}
