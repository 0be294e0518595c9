//! Open Collective financial-contribution source.
//!
//! The Open Collective API does not return unbounded all-time totals
//! reliably in one call, so the source pages through fixed six-month
//! buckets (Jan 1 / Jul 1 boundaries, oldest bucket at platform inception)
//! and emits one record per bucket that saw contributions. Empty buckets
//! are skipped, never zero-filled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::OpenCollectiveConfig;
use crate::error::{FunderError, Result};
use crate::project::ProjectRef;
use crate::record::{FundingRecord, FundingType};
use crate::sources::FundingSource;

const OPENCOLLECTIVE_GRAPHQL_BASE: &str = "https://api.opencollective.com/graphql/v2";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const INCEPTION_YEAR: i32 = 2016;

/// Contribution totals for one collective within one date window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTotals {
    pub num_contributors: u64,
    pub amount_received_usd: f64,
}

/// Financial-contributions-by-date-range query against the backing API.
/// Returns `None` when no collective exists under the slug.
#[async_trait]
pub trait CollectiveApi: Send + Sync {
    async fn window_totals(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<WindowTotals>>;
}

/// Production Open Collective GraphQL v2 client.
pub struct OpenCollectiveClient {
    http: Client,
    api_key: String,
}

impl OpenCollectiveClient {
    pub fn new(config: OpenCollectiveConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FunderError::SourceUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl CollectiveApi for OpenCollectiveClient {
    async fn window_totals(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<WindowTotals>> {
        let query = "query ($slug: String, $dateFrom: DateTime, $dateTo: DateTime) {
            collective(slug: $slug) {
                stats {
                    contributorsCount(dateFrom: $dateFrom, dateTo: $dateTo)
                    totalAmountReceived(dateFrom: $dateFrom, dateTo: $dateTo) { value }
                }
            }
        }";
        let variables = json!({
            "slug": slug,
            "dateFrom": format!("{from}T00:00:00Z"),
            "dateTo": format!("{to}T00:00:00Z"),
        });

        let url = format!("{OPENCOLLECTIVE_GRAPHQL_BASE}/{}", self.api_key);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FunderError::SourceUnavailable(format!(
                "Open Collective API error {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let envelope: CollectiveEnvelope = response.json().await?;
        let Some(collective) = envelope.data.and_then(|d| d.collective) else {
            return Ok(None);
        };
        Ok(Some(WindowTotals {
            num_contributors: collective.stats.contributors_count,
            amount_received_usd: collective.stats.total_amount_received.value,
        }))
    }
}

pub struct OpenCollectiveSource {
    api: Arc<dyn CollectiveApi>,
}

impl OpenCollectiveSource {
    pub fn new(api: Arc<dyn CollectiveApi>) -> Self {
        Self { api }
    }

    pub fn from_config(config: OpenCollectiveConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(OpenCollectiveClient::new(config)?)))
    }
}

#[async_trait]
impl FundingSource for OpenCollectiveSource {
    fn name(&self) -> &'static str {
        "Open Collective"
    }

    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        // Collectives are keyed by slug; the repo name is the best available
        // guess for it.
        let slug = project.repo.as_str();
        let mut records = Vec::new();

        // Buckets are queried oldest first, strictly sequentially.
        for (start, end) in half_year_buckets(Utc::now().date_naive()) {
            let Some(totals) = self.api.window_totals(slug, start, end).await? else {
                debug!(slug, "no collective found, stopping bucket scan");
                break;
            };
            if totals.num_contributors == 0 && totals.amount_received_usd == 0.0 {
                continue;
            }
            let mut record = FundingRecord::funded(FundingType::Sponsored);
            record.num_contributors = Some(totals.num_contributors);
            record.total_funding_usd = Some(totals.amount_received_usd);
            record.period_start = Some(start);
            record.period_end = Some(end);
            records.push(record);
        }

        Ok(records)
    }
}

/// Fixed six-month buckets `[start, end)` from platform inception through
/// the bucket containing `today`. Boundaries fall on Jan 1 and Jul 1.
pub fn half_year_buckets(today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut buckets = Vec::new();
    let mut start = NaiveDate::from_ymd_opt(INCEPTION_YEAR, 1, 1).expect("valid inception date");
    while start <= today {
        let end = next_boundary(start);
        buckets.push((start, end));
        start = end;
    }
    buckets
}

fn next_boundary(date: NaiveDate) -> NaiveDate {
    if date.month() < 7 {
        NaiveDate::from_ymd_opt(date.year(), 7, 1).expect("valid boundary")
    } else {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).expect("valid boundary")
    }
}

#[derive(Debug, Deserialize)]
struct CollectiveEnvelope {
    data: Option<CollectiveData>,
}

#[derive(Debug, Deserialize)]
struct CollectiveData {
    collective: Option<CollectiveNode>,
}

#[derive(Debug, Deserialize)]
struct CollectiveNode {
    stats: CollectiveStats,
}

#[derive(Debug, Deserialize)]
struct CollectiveStats {
    #[serde(rename = "contributorsCount", default)]
    contributors_count: u64,
    #[serde(rename = "totalAmountReceived")]
    total_amount_received: AmountValue,
}

#[derive(Debug, Deserialize)]
struct AmountValue {
    value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_start_at_inception_with_fixed_boundaries() {
        let buckets = half_year_buckets(date(2017, 3, 15));
        assert_eq!(
            buckets,
            vec![
                (date(2016, 1, 1), date(2016, 7, 1)),
                (date(2016, 7, 1), date(2017, 1, 1)),
                (date(2017, 1, 1), date(2017, 7, 1)),
            ]
        );
    }

    #[test]
    fn current_bucket_may_end_in_the_future() {
        let buckets = half_year_buckets(date(2019, 11, 2));
        let last = buckets.last().unwrap();
        assert_eq!(*last, (date(2019, 7, 1), date(2020, 1, 1)));
    }

    struct FakeCollective {
        // Totals keyed by bucket start; None simulates an unknown slug.
        windows: Option<HashMap<NaiveDate, WindowTotals>>,
    }

    #[async_trait]
    impl CollectiveApi for FakeCollective {
        async fn window_totals(
            &self,
            _slug: &str,
            from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Option<WindowTotals>> {
            Ok(self.windows.as_ref().map(|w| {
                w.get(&from).copied().unwrap_or(WindowTotals {
                    num_contributors: 0,
                    amount_received_usd: 0.0,
                })
            }))
        }
    }

    #[tokio::test]
    async fn empty_buckets_are_skipped_not_zero_filled() {
        let windows = HashMap::from([
            (
                date(2018, 7, 1),
                WindowTotals {
                    num_contributors: 12,
                    amount_received_usd: 3400.5,
                },
            ),
            (
                date(2020, 1, 1),
                WindowTotals {
                    num_contributors: 4,
                    amount_received_usd: 250.0,
                },
            ),
        ]);
        let source = OpenCollectiveSource::new(Arc::new(FakeCollective {
            windows: Some(windows),
        }));
        let project = ProjectRef::parse("babel/babel").unwrap();
        let records = source.find(&project).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].period_start, Some(date(2018, 7, 1)));
        assert_eq!(records[0].period_end, Some(date(2019, 1, 1)));
        assert_eq!(records[0].num_contributors, Some(12));
        assert_eq!(records[0].total_funding_usd, Some(3400.5));
        assert_eq!(records[1].period_start, Some(date(2020, 1, 1)));
        assert!(records.iter().all(|r| r.is_funded));
        // No record for the zero-activity 2019-01-01..2019-07-01 bucket.
        assert!(records
            .iter()
            .all(|r| r.period_start != Some(date(2019, 1, 1))));
    }

    #[tokio::test]
    async fn unknown_collective_yields_empty() {
        let source = OpenCollectiveSource::new(Arc::new(FakeCollective { windows: None }));
        let project = ProjectRef::parse("georgetown-cset/funder-finder").unwrap();
        let records = source.find(&project).await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn stats_envelope_deserializes() {
        let envelope: CollectiveEnvelope = serde_json::from_str(
            r#"{"data": {"collective": {"stats": {"contributorsCount": 9, "totalAmountReceived": {"value": 120.75}}}}}"#,
        )
        .unwrap();
        let stats = envelope.data.unwrap().collective.unwrap().stats;
        assert_eq!(stats.contributors_count, 9);
        assert_eq!(stats.total_amount_received.value, 120.75);
    }
}
