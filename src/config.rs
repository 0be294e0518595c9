//! Per-source credential configuration.
//!
//! Credentials are read once, at construction, and passed explicitly to the
//! clients that need them. Sources never consult the environment per call;
//! a source whose credential is absent is excluded at registration time.

use crate::error::{FunderError, Result};

/// GitHub API access, shared by the sponsor-platform and disclosure-text
/// sources. The GraphQL sponsors API rejects unauthenticated requests.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
}

impl GitHubConfig {
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| FunderError::MissingCredential("GITHUB_TOKEN"))?;
        Ok(Self { token })
    }
}

/// Open Collective GraphQL v2 access.
#[derive(Debug, Clone)]
pub struct OpenCollectiveConfig {
    pub api_key: String,
}

impl OpenCollectiveConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENCOLLECTIVE_API_KEY")
            .map_err(|_| FunderError::MissingCredential("OPENCOLLECTIVE_API_KEY"))?;
        Ok(Self { api_key })
    }
}

/// Aggregate configuration for the production source registry. `None` means
/// the credential was not supplied; the corresponding sources are excluded
/// with a logged warning rather than failing the whole run.
#[derive(Debug, Clone, Default)]
pub struct FunderFinderConfig {
    pub github: Option<GitHubConfig>,
    pub opencollective: Option<OpenCollectiveConfig>,
}

impl FunderFinderConfig {
    /// Read whatever credentials the environment provides. Dataset-backed
    /// sources work without any.
    pub fn from_env() -> Self {
        Self {
            github: GitHubConfig::from_env().ok(),
            opencollective: OpenCollectiveConfig::from_env().ok(),
        }
    }
}
