//! Fan-out orchestrator.
//!
//! Invokes every registered source for one project and merges their records
//! into a single provenance-tagged list. Sources run concurrently but the
//! output preserves registration order; a failing source contributes
//! nothing and never aborts the rest.

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{FunderError, Result};
use crate::project::ProjectRef;
use crate::record::FundingRecord;
use crate::sources::FundingSource;

pub struct Aggregator {
    sources: Vec<Box<dyn FundingSource>>,
    per_source_timeout: Option<Duration>,
}

impl Aggregator {
    pub fn new(sources: Vec<Box<dyn FundingSource>>) -> Self {
        Self {
            sources,
            per_source_timeout: None,
        }
    }

    /// Bound every source lookup; a source still pending at the deadline is
    /// treated as unavailable without blocking the others.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.per_source_timeout = Some(limit);
        self
    }

    pub fn register(&mut self, source: Box<dyn FundingSource>) {
        self.sources.push(source);
    }

    /// Parse an identifier and aggregate. Only `MalformedIdentifier` is
    /// fatal; "no funding found" is an empty list.
    pub async fn aggregate_identifier(&self, input: &str) -> Result<Vec<FundingRecord>> {
        let project = ProjectRef::parse(input)?;
        Ok(self.aggregate(&project).await)
    }

    /// Fan the project out to every source and merge the results.
    ///
    /// Every emitted record is tagged with the source's declared name and
    /// the aggregation date. Output ordering follows registration order,
    /// not completion order. No cross-source deduplication: two sources may
    /// legitimately report the same underlying funder.
    pub async fn aggregate(&self, project: &ProjectRef) -> Vec<FundingRecord> {
        let collected_at = Utc::now().date_naive();

        let lookups = self.sources.iter().map(|source| async move {
            let result = match self.per_source_timeout {
                Some(limit) => timeout(limit, source.find(project)).await.unwrap_or_else(|_| {
                    Err(FunderError::SourceUnavailable(format!(
                        "no response within {limit:?}"
                    )))
                }),
                None => source.find(project).await,
            };
            (source.name(), result)
        });

        let mut merged = Vec::new();
        for (name, result) in join_all(lookups).await {
            match result {
                Ok(records) => {
                    debug!(source = name, count = records.len(), "source responded");
                    for mut record in records {
                        if !record.is_funded {
                            warn!(source = name, "dropping record without positive evidence");
                            continue;
                        }
                        record.source_name = Some(name.to_string());
                        record.collected_at = Some(collected_at);
                        merged.push(record);
                    }
                }
                Err(e) => warn!(source = name, error = %e, "no data from source"),
            }
        }
        merged
    }
}
