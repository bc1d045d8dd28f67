//! Page download
//!
//! This module handles the one outbound GET that retrieves the page under
//! analysis. Link probes use their own client in [`crate::links`].

mod fetcher;

pub use fetcher::{build_http_client, fetch_document, FetchedDocument};
