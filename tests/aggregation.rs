//! End-to-end aggregation over the bundled reference datasets, with the
//! API-backed sources stubbed to report no evidence.

use async_trait::async_trait;

use funder_finder::sources::{FundingSource, GsocSource, NumFocusSource};
use funder_finder::{Aggregator, FundingRecord, ProjectRef, Result};

struct EmptyApiSource {
    name: &'static str,
}

#[async_trait]
impl FundingSource for EmptyApiSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn find(&self, _project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        Ok(Vec::new())
    }
}

fn registry() -> Aggregator {
    Aggregator::new(vec![
        Box::new(EmptyApiSource {
            name: "GitHub Sponsors",
        }),
        Box::new(NumFocusSource::bundled()),
        Box::new(EmptyApiSource {
            name: "Open Collective",
        }),
        Box::new(EmptyApiSource { name: "Tidelift" }),
        Box::new(GsocSource::bundled()),
    ])
}

#[tokio::test]
async fn pandas_is_reported_by_the_affiliation_registry() {
    let records = registry()
        .aggregate_identifier("pandas-dev/pandas")
        .await
        .unwrap();

    assert!(records
        .iter()
        .any(|r| r.source_name.as_deref() == Some("NumFOCUS") && r.is_funded));
}

#[tokio::test]
async fn unknown_project_yields_an_empty_list() {
    let records = registry()
        .aggregate_identifier("georgetown-cset/funder-finder")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn gsoc_participation_shows_up_with_provenance() {
    let records = registry()
        .aggregate_identifier("enigma-dev/enigma-dev")
        .await
        .unwrap();

    let gsoc: Vec<_> = records
        .iter()
        .filter(|r| r.source_name.as_deref() == Some("Google Summer of Code"))
        .collect();
    assert_eq!(gsoc.len(), 1);
    assert!(!gsoc[0].contributions.is_empty());
    assert!(gsoc[0].collected_at.is_some());
}

#[tokio::test]
async fn repeated_aggregation_is_idempotent_aside_from_timestamps() {
    let aggregator = registry();
    let strip = |mut records: Vec<FundingRecord>| {
        for record in &mut records {
            record.collected_at = None;
        }
        records
    };

    let first = strip(
        aggregator
            .aggregate_identifier("enigma-dev/enigma-dev")
            .await
            .unwrap(),
    );
    let second = strip(
        aggregator
            .aggregate_identifier("enigma-dev/enigma-dev")
            .await
            .unwrap(),
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn merged_output_serializes_to_json() {
    let records = registry()
        .aggregate_identifier("https://github.com/pandas-dev/pandas/")
        .await
        .unwrap();
    let json = serde_json::to_string_pretty(&records).unwrap();
    assert!(json.contains("\"source_name\": \"NumFOCUS\""));
    assert!(json.contains("\"is_funded\": true"));
}
