//! The common funding-event schema all sources normalize into.
//!
//! Historical source implementations each shaped their raw responses
//! differently; adapters translate into this schema at their boundary and
//! never leak source-specific field names downstream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source-specific funding vocabulary. Not unified further across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingType {
    /// The repository owner has organizational sponsors.
    Organizational,
    /// One or more top contributors have personal sponsors.
    Individual,
    /// A sponsor entity disclosed via the repository's funding links.
    SponsorThisProject,
    /// Listed as affiliated by an affiliation registry.
    Affiliated,
    /// Sponsored by a registry, program, or collective.
    Sponsored,
    /// Funding statement found in disclosure text.
    Disclosed,
}

/// A single dated contribution, ordered by occurrence, not deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub date_contribution_made: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_received_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_name: Option<String>,
}

/// One normalized funding signal emitted by a source.
///
/// Sources emit only positive evidence: a record with `is_funded == false`
/// never reaches the merged output. `source_name` and `collected_at` are
/// provenance fields owned by the aggregator, never set by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_type: Option<FundingType>,
    pub is_funded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_contributors: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_funding_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub contributions: Vec<Contribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<NaiveDate>,
}

impl FundingRecord {
    /// A bare positive signal of the given type, with no stats attached.
    pub fn funded(funding_type: FundingType) -> Self {
        Self {
            funding_type: Some(funding_type),
            is_funded: true,
            num_contributors: None,
            total_funding_usd: None,
            period_start: None,
            period_end: None,
            contributions: Vec::new(),
            source_name: None,
            collected_at: None,
        }
    }
}
