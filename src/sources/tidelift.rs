//! Tidelift disclosure-text source.
//!
//! Tidelift has no public per-project funding API, so the check is textual:
//! probe the likely README files on the likely default branches and look
//! for the platform's name. If no README mentions it, fall back to the
//! repository's funding-disclosure links.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::github::GitHubApi;
use crate::project::ProjectRef;
use crate::record::{FundingRecord, FundingType};
use crate::sources::FundingSource;

const PLATFORM_NAME: &str = "tidelift";

// Most likely README names, probed in order.
const README_NAMES: [&str; 6] = [
    "README.md",
    "Readme.md",
    "readme.md",
    "README.rst",
    "Readme.rst",
    "readme.rst",
];
const BRANCHES: [&str; 2] = ["main", "master"];

pub struct TideliftSource {
    api: Arc<dyn GitHubApi>,
}

impl TideliftSource {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        Self { api }
    }

    /// Whether some disclosure text indicates Tidelift funding.
    pub fn mentions_platform(text: &str) -> bool {
        text.to_lowercase().contains(PLATFORM_NAME)
    }
}

#[async_trait]
impl FundingSource for TideliftSource {
    fn name(&self) -> &'static str {
        "Tidelift"
    }

    async fn find(&self, project: &ProjectRef) -> Result<Vec<FundingRecord>> {
        // Strictly sequential probing; the first matching file wins and no
        // further files are checked. A README that exists but does not
        // mention the platform does not stop the probe.
        for name in README_NAMES {
            for branch in BRANCHES {
                if let Some(text) = self.api.raw_file(project, branch, name).await? {
                    if Self::mentions_platform(&text) {
                        return Ok(vec![FundingRecord::funded(FundingType::Disclosed)]);
                    }
                }
            }
        }

        let links = self.api.funding_links(project).await?;
        if links.iter().any(|link| Self::mentions_platform(link)) {
            return Ok(vec![FundingRecord::funded(FundingType::Disclosed)]);
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fake GitHub keyed by `(branch, path)`, counting raw-file probes.
    #[derive(Default)]
    struct FakeRepo {
        files: HashMap<(String, String), String>,
        funding_links: Vec<String>,
        probes: Mutex<u32>,
    }

    impl FakeRepo {
        fn with_file(mut self, branch: &str, path: &str, text: &str) -> Self {
            self.files
                .insert((branch.to_string(), path.to_string()), text.to_string());
            self
        }

        fn probe_count(&self) -> u32 {
            *self.probes.lock().unwrap()
        }
    }

    #[async_trait]
    impl GitHubApi for FakeRepo {
        async fn org_sponsor_count(&self, _org: &str) -> Result<Option<u64>> {
            Ok(None)
        }

        async fn user_sponsor_count(&self, _login: &str) -> Result<u64> {
            Ok(0)
        }

        async fn top_contributors(
            &self,
            _project: &ProjectRef,
            _limit: usize,
        ) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn funding_links(&self, _project: &ProjectRef) -> Result<Vec<String>> {
            Ok(self.funding_links.clone())
        }

        async fn raw_file(
            &self,
            _project: &ProjectRef,
            branch: &str,
            path: &str,
        ) -> Result<Option<String>> {
            *self.probes.lock().unwrap() += 1;
            Ok(self
                .files
                .get(&(branch.to_string(), path.to_string()))
                .cloned())
        }
    }

    fn project() -> ProjectRef {
        ProjectRef::parse("pypa/setuptools").unwrap()
    }

    #[test]
    fn platform_mention_is_case_insensitive() {
        assert!(TideliftSource::mentions_platform(
            "This project is supported by Tidelift."
        ));
        assert!(TideliftSource::mentions_platform("TIDELIFT subscription"));
        assert!(!TideliftSource::mentions_platform("no funding here"));
    }

    #[tokio::test]
    async fn first_matching_readme_wins_without_further_probes() {
        let fake = Arc::new(
            FakeRepo::default()
                .with_file("main", "README.md", "Funded via Tidelift subscribers"),
        );
        let source = TideliftSource::new(fake.clone());
        let records = source.find(&project()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].funding_type, Some(FundingType::Disclosed));
        assert_eq!(fake.probe_count(), 1);
    }

    #[tokio::test]
    async fn non_matching_readme_does_not_stop_probing() {
        let fake = Arc::new(
            FakeRepo::default()
                .with_file("main", "README.md", "just a readme")
                .with_file("master", "README.rst", "see tidelift for support"),
        );
        let source = TideliftSource::new(fake.clone());
        let records = source.find(&project()).await.unwrap();

        assert_eq!(records.len(), 1);
        // Probing continued past the non-matching main/README.md.
        assert!(fake.probe_count() > 1);
    }

    #[tokio::test]
    async fn falls_back_to_funding_links() {
        let fake = FakeRepo {
            funding_links: vec!["https://tidelift.com/funding/github/pypi/setuptools".to_string()],
            ..Default::default()
        };
        let source = TideliftSource::new(Arc::new(fake));
        let records = source.find(&project()).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn no_evidence_yields_empty_list() {
        let fake = FakeRepo::default().with_file("main", "README.md", "nothing relevant");
        let source = TideliftSource::new(Arc::new(fake));
        let records = source.find(&project()).await.unwrap();
        assert!(records.is_empty());
    }
}
