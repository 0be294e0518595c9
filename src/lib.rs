//! funder-finder: aggregate public funding signals for an open-source
//! project across independent sources.
//!
//! Give the aggregator a repository identifier (`owner/repo` or a full URL)
//! and it fans out to every registered funding source — GitHub Sponsors,
//! the NumFOCUS affiliation listing, Open Collective, Tidelift disclosure
//! text, and the Google Summer of Code archive — then merges whatever
//! positive evidence comes back into one ordered, provenance-tagged list of
//! [`FundingRecord`]s.
//!
//! ```no_run
//! use funder_finder::{production_sources, Aggregator, FunderFinderConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = FunderFinderConfig::from_env();
//! let aggregator = Aggregator::new(production_sources(&config));
//! let records = aggregator.aggregate_identifier("pandas-dev/pandas").await?;
//! println!("{}", serde_json::to_string_pretty(&records)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod dataset;
pub mod error;
pub mod github;
pub mod project;
pub mod record;
pub mod sources;

pub use aggregator::Aggregator;
pub use config::{FunderFinderConfig, GitHubConfig, OpenCollectiveConfig};
pub use error::{FunderError, Result};
pub use project::ProjectRef;
pub use record::{Contribution, FundingRecord, FundingType};
pub use sources::{production_sources, FundingSource};
