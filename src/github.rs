//! GitHub API boundary.
//!
//! The sponsor-platform and disclosure-text sources consume GitHub through
//! the `GitHubApi` trait so their matching logic can be exercised against
//! in-process fakes. `GitHubClient` is the production implementation:
//! GraphQL for sponsor counts and funding links, REST for top contributors,
//! raw.githubusercontent.com for README probing.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;

use crate::config::GitHubConfig;
use crate::error::{FunderError, Result};
use crate::project::ProjectRef;

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;
// Keep well under GitHub's secondary rate limits.
const RATE_LIMIT_DELAY_MS: u64 = 250;

/// Read-only queries against GitHub consumed by the funding sources.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Sponsor count for an organization, `None` when the owner is not an
    /// organization.
    async fn org_sponsor_count(&self, org: &str) -> Result<Option<u64>>;

    /// Personal sponsor count for a user.
    async fn user_sponsor_count(&self, login: &str) -> Result<u64>;

    /// Logins of the repository's top contributors, most active first.
    async fn top_contributors(&self, project: &ProjectRef, limit: usize) -> Result<Vec<String>>;

    /// URLs listed under the repository's funding-disclosure UI.
    async fn funding_links(&self, project: &ProjectRef) -> Result<Vec<String>>;

    /// Fetch a file from a branch, `None` when it does not exist.
    async fn raw_file(
        &self,
        project: &ProjectRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>>;
}

/// Production GitHub client, paced to a minimum inter-request interval.
pub struct GitHubClient {
    http: Client,
    token: String,
    last_request: Mutex<Instant>,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("funder-finder/0.1")
            .build()
            .map_err(|e| FunderError::SourceUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            token: config.token,
            last_request: Mutex::new(Instant::now()),
        })
    }

    /// Enforce the minimum inter-request interval.
    async fn rate_limit(&self) {
        let elapsed = {
            let last = self.last_request.lock().unwrap();
            last.elapsed()
        };

        if elapsed < Duration::from_millis(RATE_LIMIT_DELAY_MS) {
            sleep(Duration::from_millis(RATE_LIMIT_DELAY_MS) - elapsed).await;
        }

        let mut last = self.last_request.lock().unwrap();
        *last = Instant::now();
    }

    async fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        self.rate_limit().await;

        let response = self
            .http
            .post(GITHUB_GRAPHQL_URL)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FunderError::SourceUnavailable(format!(
                "GitHub GraphQL error {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;
        envelope.data.ok_or_else(|| {
            FunderError::SourceUnavailable("GitHub GraphQL response had no data".to_string())
        })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn org_sponsor_count(&self, org: &str) -> Result<Option<u64>> {
        let query = "query ($org: String!) {
            organization(login: $org) { sponsors { totalCount } }
        }";
        let data: OrgSponsorsData = self.graphql(query, json!({ "org": org })).await?;
        Ok(data.organization.map(|o| o.sponsors.total_count))
    }

    async fn user_sponsor_count(&self, login: &str) -> Result<u64> {
        let query = "query ($user: String!) {
            user(login: $user) { sponsors { totalCount } }
        }";
        let data: UserSponsorsData = self.graphql(query, json!({ "user": login })).await?;
        Ok(data.user.map(|u| u.sponsors.total_count).unwrap_or(0))
    }

    async fn top_contributors(&self, project: &ProjectRef, limit: usize) -> Result<Vec<String>> {
        self.rate_limit().await;

        // The GraphQL API does not expose repository contributors.
        let url = format!(
            "{GITHUB_API_BASE}/repos/{}/{}/contributors?page=1&per_page={limit}",
            project.owner, project.repo
        );
        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FunderError::SourceUnavailable(format!(
                "GitHub contributors query failed for {project}: {status}"
            )));
        }

        let contributors: Vec<RestContributor> = response.json().await?;
        Ok(contributors.into_iter().map(|c| c.login).collect())
    }

    async fn funding_links(&self, project: &ProjectRef) -> Result<Vec<String>> {
        let query = "query ($owner: String!, $repo: String!) {
            repository(owner: $owner, name: $repo) { fundingLinks { url } }
        }";
        let data: FundingLinksData = self
            .graphql(
                query,
                json!({ "owner": project.owner, "repo": project.repo }),
            )
            .await?;
        Ok(data
            .repository
            .map(|r| r.funding_links.into_iter().map(|l| l.url).collect())
            .unwrap_or_default())
    }

    async fn raw_file(
        &self,
        project: &ProjectRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        self.rate_limit().await;

        let url = format!(
            "{GITHUB_RAW_BASE}/{}/{}/{branch}/{path}",
            project.owner, project.repo
        );
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FunderError::SourceUnavailable(format!(
                "raw file fetch failed for {url}: {status}"
            )));
        }
        Ok(Some(response.text().await?))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SponsorCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct SponsorHolder {
    sponsors: SponsorCount,
}

#[derive(Debug, Deserialize)]
struct OrgSponsorsData {
    organization: Option<SponsorHolder>,
}

#[derive(Debug, Deserialize)]
struct UserSponsorsData {
    user: Option<SponsorHolder>,
}

#[derive(Debug, Deserialize)]
struct FundingLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct FundingLinksRepo {
    #[serde(rename = "fundingLinks", default)]
    funding_links: Vec<FundingLink>,
}

#[derive(Debug, Deserialize)]
struct FundingLinksData {
    repository: Option<FundingLinksRepo>,
}

#[derive(Debug, Deserialize)]
struct RestContributor {
    login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_envelopes_deserialize() {
        let data: OrgSponsorsData = serde_json::from_str(
            r#"{"organization": {"sponsors": {"totalCount": 12}}}"#,
        )
        .unwrap();
        assert_eq!(data.organization.unwrap().sponsors.total_count, 12);

        let data: OrgSponsorsData = serde_json::from_str(r#"{"organization": null}"#).unwrap();
        assert!(data.organization.is_none());
    }

    #[test]
    fn funding_links_default_to_empty() {
        let data: FundingLinksData = serde_json::from_str(r#"{"repository": {}}"#).unwrap();
        assert!(data.repository.unwrap().funding_links.is_empty());
    }
}
