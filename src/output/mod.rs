//! Output module for presenting analysis results
//!
//! This module handles:
//! - Rendering results as JSON (the HTTP API body format)
//! - Formatting a human-readable summary for the command line

use crate::analysis::AnalysisResult;
use std::fmt::Write;

/// Renders a result as JSON, optionally pretty-printed
pub fn render_json(result: &AnalysisResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Formats a console summary of a page analysis
pub fn format_summary(url: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Page Analysis: {} ===\n", url);

    if let Some(error) = &result.error {
        let _ = writeln!(out, "Error: {}", error);
        return out;
    }

    let title = if result.title.is_empty() {
        "(none)"
    } else {
        result.title.as_str()
    };
    let version = result.html_version.map_or("", |v| v.as_str());

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Title: {}", title);
    let _ = writeln!(out, "  HTML version: {}", version);
    let _ = writeln!(out);

    let _ = writeln!(out, "Headings ({}):", result.headings.len());
    for heading in &result.headings {
        let _ = writeln!(out, "  {} {}", heading.level.tag_name(), heading.text);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Links ({} unique):", result.links.len());
    let _ = writeln!(out, "  Internal: {}", result.internal_links);
    let _ = writeln!(out, "  External: {}", result.external_links);
    let _ = writeln!(out, "  Inaccessible: {}", result.inaccessible_links);
    let _ = writeln!(out);

    if result.login_detected {
        let _ = writeln!(
            out,
            "Login form: detected ({})",
            result.login_indicators.join(", ")
        );
    } else {
        let _ = writeln!(out, "Login form: not detected");
    }

    out
}

/// Prints the console summary to stdout
pub fn print_summary(url: &str, result: &AnalysisResult) {
    print!("{}", format_summary(url, result));
}
