//! Google Summer of Code program-archive source.
//!
//! Matches a project against the scraped archive of participating repos,
//! one dataset entry per program year. Participation is recorded as one
//! synthesized contribution per matched year, dated to the program's annual
//! start. The archive scraper lives outside this crate; the dataset is
//! consumed read-only.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dataset::{self, ProgramYearEntry};
use crate::error::Result;
use crate::project::ProjectRef;
use crate::record::{Contribution, FundingRecord, FundingType};
use crate::sources::FundingSource;

const BUNDLED_DATASET: &str = include_str!("../../data/gsoc.jsonl");

// GSoC coding periods start in May.
const PROGRAM_START_MONTH: u32 = 5;
const PROGRAM_START_DAY: u32 = 1;

pub struct GsocSource {
    entries: Vec<ProgramYearEntry>,
}

impl GsocSource {
    pub fn new(entries: Vec<ProgramYearEntry>) -> Self {
        Self { entries }
    }

    /// The archive snapshot shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(dataset::parse_jsonl(BUNDLED_DATASET))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(dataset::load_jsonl(path)?))
    }

    /// Distinct years in which the identifier participated.
    ///
    /// A full `owner/repo` slug must be listed verbatim. A bare owner (no
    /// repo part) additionally matches the owner part of any listed repo.
    pub fn participation_years(&self, identifier: &str) -> BTreeSet<i32> {
        let identifier_is_owner = !identifier.contains('/');
        let mut years = BTreeSet::new();
        for entry in &self.entries {
            let exact = entry.repos.iter().any(|repo| repo == identifier);
            let owner = identifier_is_owner
                && entry
                    .repos
                    .iter()
                    .any(|repo| repo.split('/').next() == Some(identifier));
            if exact || owner {
                years.insert(entry.year);
            }
        }
        years
    }
}

#[async_trait]
impl FundingSource for GsocSource {
    fn name(&self) -> &'static str {
        "Google Summer of Code"
    }

    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        let years = self.participation_years(&project.slug());
        if years.is_empty() {
            return Ok(Vec::new());
        }
        let mut record = FundingRecord::funded(FundingType::Sponsored);
        record.contributions = years
            .into_iter()
            .filter_map(|year| {
                NaiveDate::from_ymd_opt(year, PROGRAM_START_MONTH, PROGRAM_START_DAY)
            })
            .map(|date| Contribution {
                date_contribution_made: date,
                amount_received_usd: None,
                contributor_name: None,
            })
            .collect();
        Ok(vec![record])
    }
}
