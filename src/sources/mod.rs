//! Funding sources.
//!
//! Each source implements the `FundingSource` trait against its own backing
//! data: a reference dataset scan, an external API, or disclosure-text
//! probing. Sources return only positive evidence; "not funded" is an empty
//! list, never an error.

pub mod github_sponsors;
pub mod gsoc;
pub mod numfocus;
pub mod opencollective;
pub mod tidelift;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::FunderFinderConfig;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::project::ProjectRef;
use crate::record::FundingRecord;

pub use github_sponsors::GitHubSponsorsSource;
pub use gsoc::GsocSource;
pub use numfocus::{AffiliationQuery, NumFocusSource};
pub use opencollective::OpenCollectiveSource;
pub use tidelift::TideliftSource;

/// Uniform contract every funding source implements.
#[async_trait]
pub trait FundingSource: Send + Sync {
    /// Human-readable source name, used by the aggregator as the provenance
    /// tag on every record this source emits.
    fn name(&self) -> &'static str;

    /// Look up funding evidence for a project.
    ///
    /// Returns an empty list when the project is not funded by this source.
    /// `SourceUnavailable` signals a transient backing-service failure and
    /// is treated by the aggregator as "no data from this source".
    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>>;
}

/// Build the production source registry in its fixed registration order.
///
/// Sources whose credential is absent are excluded with a warning rather
/// than failing the run; the dataset-backed sources always register.
pub fn production_sources(config: &FunderFinderConfig) -> Vec<Box<dyn FundingSource>> {
    let mut sources: Vec<Box<dyn FundingSource>> = Vec::new();

    let github = match &config.github {
        Some(gh_config) => match GitHubClient::new(gh_config.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "could not construct GitHub client");
                None
            }
        },
        None => None,
    };

    match &github {
        Some(client) => sources.push(Box::new(GitHubSponsorsSource::new(client.clone()))),
        None => warn!("GITHUB_TOKEN not configured, skipping GitHub Sponsors source"),
    }

    sources.push(Box::new(NumFocusSource::bundled()));

    match &config.opencollective {
        Some(oc_config) => match OpenCollectiveSource::from_config(oc_config.clone()) {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => warn!(error = %e, "skipping Open Collective source"),
        },
        None => warn!("OPENCOLLECTIVE_API_KEY not configured, skipping Open Collective source"),
    }

    match &github {
        Some(client) => sources.push(Box::new(TideliftSource::new(client.clone()))),
        None => warn!("GITHUB_TOKEN not configured, skipping Tidelift source"),
    }

    sources.push(Box::new(GsocSource::bundled()));

    sources
}
