//! Page-Lens: a single-page web analyzer
//!
//! This crate fetches one web page and reports its title, document version,
//! heading outline, link inventory (internal, external and unreachable) and
//! whether it looks like a login page.

pub mod analysis;
pub mod config;
pub mod fetch;
pub mod links;
pub mod output;
pub mod parser;
pub mod server;

use thiserror::Error;

/// Main error type for Page-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while downloading the page under analysis
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("fetching url failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("reading response failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// Errors raised while turning raw bytes into a document tree
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not valid {0}")]
    InvalidEncoding(&'static str),
}

/// Result type alias for Page-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

// Re-export commonly used types
pub use analysis::{AnalysisResult, Analyzer, Heading, HeadingLevel};
pub use config::Config;
pub use fetch::{fetch_document, FetchedDocument};
pub use parser::HtmlVersion;
