//! Link resolution, classification and liveness probing
//!
//! This module handles everything that happens to an anchor target after it
//! has been pulled out of the page:
//! - Resolving it against the page URL
//! - Classifying it as internal or external by host
//! - Probing it with a HEAD request

mod classify;
mod prober;

pub use classify::{
    classify_links, raw_host, resolve_href, LinkRecord, LinkScope, PageBase, ResolvedLink,
};
pub use prober::{probe_link, ProbeOutcome, Prober};

use std::collections::HashSet;

/// Returns true for anchor targets that never point at another resource
///
/// This is the single filter used both for the reported link list and for
/// classification: empty targets, `javascript:` targets and same-page
/// fragments are skipped. The caller trims the value first.
pub fn is_skippable_href(href: &str) -> bool {
    href.is_empty() || href.starts_with("javascript:") || href.starts_with('#')
}

/// Link counts reported for a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub inaccessible: usize,
}

/// Resolves and classifies raw anchor targets, probes every distinct target
/// and counts the results
///
/// Counting is keyed by the resolved URL: two raw targets that resolve to the
/// same URL are classified and probed once.
pub async fn classify_and_probe(
    raw_links: &[String],
    base_url: &str,
    prober: &Prober,
) -> LinkCounts {
    let mut records = classify_links(raw_links, base_url);

    let mut internal = HashSet::new();
    let mut external = HashSet::new();
    let mut targets = Vec::new();

    for record in &records {
        let newly_seen = match record.scope {
            LinkScope::Internal => internal.insert(record.resolved.clone()),
            LinkScope::External => external.insert(record.resolved.clone()),
        };
        if newly_seen {
            targets.push(record.resolved.clone());
        }
    }

    let failures = prober.probe_all(targets).await;
    for record in &mut records {
        record.probe_failed = failures.contains(&record.resolved);
        if record.probe_failed {
            tracing::debug!(
                "Inaccessible link {} (resolved to {})",
                record.raw_href,
                record.resolved
            );
        }
    }

    LinkCounts {
        internal: internal.len(),
        external: external.len(),
        inaccessible: failures.len(),
    }
}
