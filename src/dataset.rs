//! Reference datasets: newline-delimited JSON listings of known funded or
//! affiliated projects, regenerated periodically outside this crate and
//! consumed read-only by the registry-backed sources.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FunderError, Result};

/// Relationship between a project and an affiliation registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Sponsored,
    Affiliated,
}

/// One affiliation-registry listing. Matching key fields may be null; null
/// fields are excluded from comparison for that entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliationEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub github_name: Option<String>,
    pub relationship: Relationship,
}

/// One program-archive listing: the repos that participated in a given year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramYearEntry {
    pub year: i32,
    pub repos: Vec<String>,
}

/// Parse one dataset line, surfacing decode failures as `Matching` errors.
fn parse_line<T: DeserializeOwned>(line: &str) -> Result<T> {
    serde_json::from_str(line).map_err(|e| FunderError::Matching(e.to_string()))
}

/// Parse newline-delimited JSON. Malformed lines are logged and skipped;
/// scanning continues. Blank lines are ignored.
pub fn parse_jsonl<T: DeserializeOwned>(text: &str) -> Vec<T> {
    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(line = lineno + 1, error = %e, "skipping malformed dataset line"),
        }
    }
    entries
}

/// Load a dataset file. An unreadable file is a source-level failure; a
/// malformed line within a readable file is not.
pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        FunderError::SourceUnavailable(format!("cannot read {}: {e}", path.display()))
    })?;
    Ok(parse_jsonl(&text))
}
