//! GitHub Sponsors source.
//!
//! Checks three distinct sponsorship signals for a repository:
//! organizational sponsors of the owner, personal sponsors of the top
//! contributors, and sponsor entities disclosed via the repository's
//! funding links that neither of the first two checks already covered.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::github::GitHubApi;
use crate::project::ProjectRef;
use crate::record::{FundingRecord, FundingType};
use crate::sources::FundingSource;

const TOP_CONTRIBUTOR_COUNT: usize = 3;

pub struct GitHubSponsorsSource {
    api: Arc<dyn GitHubApi>,
}

impl GitHubSponsorsSource {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FundingSource for GitHubSponsorsSource {
    fn name(&self) -> &'static str {
        "GitHub Sponsors"
    }

    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        let mut records = Vec::new();

        // Owner-level sponsorship. `None` means the owner is a user, not an
        // organization.
        if let Some(count) = self.api.org_sponsor_count(&project.owner).await? {
            if count > 0 {
                let mut record = FundingRecord::funded(FundingType::Organizational);
                record.num_contributors = Some(count);
                records.push(record);
            }
        }

        // Per-contributor sponsorship. Individual counts are not merged or
        // deduplicated across users, so the record carries no count.
        let contributors = self
            .api
            .top_contributors(project, TOP_CONTRIBUTOR_COUNT)
            .await?;
        let mut any_sponsored = false;
        for login in &contributors {
            if self.api.user_sponsor_count(login).await? > 0 {
                any_sponsored = true;
            }
        }
        if any_sponsored {
            records.push(FundingRecord::funded(FundingType::Individual));
        }

        // Disclosed sponsor entities not already covered above.
        let links = self.api.funding_links(project).await?;
        let checked: HashSet<String> = contributors
            .iter()
            .map(|login| login.to_lowercase())
            .chain(std::iter::once(project.owner.to_lowercase()))
            .collect();
        let has_uncounted_entity = links
            .iter()
            .filter_map(|link| link_entity(link))
            .any(|entity| !checked.contains(&entity));
        if has_uncounted_entity {
            records.push(FundingRecord::funded(FundingType::SponsorThisProject));
        }

        Ok(records)
    }
}

/// The sponsored entity named by a funding link: its trailing path segment.
fn link_entity(link: &str) -> Option<String> {
    link.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_lowercase())
}
