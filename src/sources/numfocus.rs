//! NumFOCUS affiliation-registry source.
//!
//! A project counts as funded when its name, slug, or GitHub identifier
//! matches any entry of the scraped NumFOCUS listing (sponsored and
//! affiliated projects). The listing is regenerated periodically outside
//! this crate; a snapshot ships with it.

use std::path::Path;

use async_trait::async_trait;

use crate::dataset::{self, AffiliationEntry, Relationship};
use crate::error::Result;
use crate::project::ProjectRef;
use crate::record::{FundingRecord, FundingType};
use crate::sources::FundingSource;

const BUNDLED_DATASET: &str = include_str!("../../data/numfocus.jsonl");

/// Search keys for an affiliation lookup. Every field is optional; null
/// fields are skipped during comparison, on either side.
#[derive(Debug, Clone, Default)]
pub struct AffiliationQuery {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub github_name: Option<String>,
}

impl AffiliationQuery {
    pub fn for_project(project: &ProjectRef) -> Self {
        Self {
            name: None,
            slug: None,
            github_name: Some(project.slug()),
        }
    }
}

pub struct NumFocusSource {
    entries: Vec<AffiliationEntry>,
}

impl NumFocusSource {
    pub fn new(entries: Vec<AffiliationEntry>) -> Self {
        Self { entries }
    }

    /// The dataset snapshot shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(dataset::parse_jsonl(BUNDLED_DATASET))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(dataset::load_jsonl(path)?))
    }

    /// Scan every entry for a match on any provided query field. Returns the
    /// relationship of the first matching entry.
    pub fn affiliation(&self, query: &AffiliationQuery) -> Option<Relationship> {
        self.entries
            .iter()
            .find(|entry| entry_matches(entry, query))
            .map(|entry| entry.relationship)
    }
}

#[async_trait]
impl FundingSource for NumFocusSource {
    fn name(&self) -> &'static str {
        "NumFOCUS"
    }

    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        let query = AffiliationQuery::for_project(project);
        Ok(match self.affiliation(&query) {
            Some(relationship) => vec![FundingRecord::funded(match relationship {
                Relationship::Sponsored => FundingType::Sponsored,
                Relationship::Affiliated => FundingType::Affiliated,
            })],
            None => Vec::new(),
        })
    }
}

fn entry_matches(entry: &AffiliationEntry, query: &AffiliationQuery) -> bool {
    field_matches(&entry.name, &query.name)
        || field_matches(&entry.slug, &query.slug)
        || match (&entry.github_name, &query.github_name) {
            (Some(entry_gh), Some(query_gh)) => github_name_matches(entry_gh, query_gh),
            _ => false,
        }
}

/// Case-insensitive equality, skipping the comparison entirely when either
/// side is null. A null field is never a wildcard and never a mismatch.
fn field_matches(entry_field: &Option<String>, query_field: &Option<String>) -> bool {
    match (entry_field, query_field) {
        (Some(entry_val), Some(query_val)) => entry_val.eq_ignore_ascii_case(query_val),
        _ => false,
    }
}

/// GitHub identifier comparison with organization-level affiliation: an
/// entry listing just an owner covers every repo under that owner, and an
/// owner-only query matches any entry listed under that owner.
fn github_name_matches(entry_gh: &str, query_gh: &str) -> bool {
    if entry_gh.eq_ignore_ascii_case(query_gh) {
        return true;
    }
    if let Some(query_owner) = query_gh.split('/').next() {
        if entry_gh.eq_ignore_ascii_case(query_owner) {
            return true;
        }
    }
    if !query_gh.contains('/') {
        if let Some(entry_owner) = entry_gh.split('/').next() {
            if entry_owner.eq_ignore_ascii_case(query_gh) {
                return true;
            }
        }
    }
    false
}
