//! Capture file pre-flight.
//!
//! Runs before any upload: the file must carry a `.har` extension, the user
//! must have described what to look for, and the content must be a JSON HAR
//! log with an `entries` array. Nothing is sent to the backend on failure.

mod parse;

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

use crate::validation::ValidationError;

use parse::HarLog;

/// What the pre-flight learned about a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarSummary {
    pub file_name: String,
    pub version: Option<String>,
    pub entry_count: usize,
    /// Hosts in first-seen order.
    pub hosts: Vec<String>,
    /// Entries whose response status was 4xx/5xx.
    pub failed_responses: usize,
}

/// True when `path` ends in `.har` (case-insensitive).
pub fn has_har_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("har"))
}

/// Validates `path` and `description` for upload.
///
/// Rejections are [`ValidationError`]s inside the returned `anyhow::Error`;
/// an unreadable file is reported with its path as context.
pub fn preflight(path: &Path, description: &str) -> Result<HarSummary> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(ValidationError::MissingFileName)?;
    if !has_har_extension(path) {
        return Err(ValidationError::UnsupportedFileType { name: file_name }.into());
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription.into());
    }

    let bytes = std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    if bytes.is_empty() {
        return Err(ValidationError::EmptyFile { name: file_name }.into());
    }
    let har: HarLog = serde_json::from_slice(&bytes).map_err(|e| ValidationError::InvalidHar {
        name: file_name.clone(),
        reason: e.to_string(),
    })?;

    let mut hosts: Vec<String> = Vec::new();
    for entry in &har.log.entries {
        let Ok(url) = Url::parse(&entry.request.url) else {
            continue;
        };
        if let Some(host) = url.host_str() {
            if !hosts.iter().any(|h| h == host) {
                hosts.push(host.to_string());
            }
        }
    }
    let failed_responses = har
        .log
        .entries
        .iter()
        .filter_map(|e| e.response.as_ref())
        .filter(|r| r.status >= 400)
        .count();

    let summary = HarSummary {
        file_name,
        version: har.log.version,
        entry_count: har.log.entries.len(),
        hosts,
        failed_responses,
    };
    if summary.entry_count == 0 {
        tracing::warn!("{} contains no entries", summary.file_name);
    }
    tracing::debug!(
        "{}: {} entries across {} hosts",
        summary.file_name,
        summary.entry_count,
        summary.hosts.len()
    );
    Ok(summary)
}
