use thiserror::Error;

/// Error taxonomy for the funding aggregation pipeline.
///
/// Only `MalformedIdentifier` is fatal to an aggregation run. The other
/// variants are scoped to a single source and handled by the aggregator
/// (skip and warn) or at registry construction (exclude the source).
#[derive(Debug, Error)]
pub enum FunderError {
    #[error("malformed project identifier: {0}")]
    MalformedIdentifier(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed dataset entry: {0}")]
    Matching(String),
}

impl FunderError {
    /// Transient backing-service failure, treated by the aggregator as
    /// "no evidence from this source".
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

impl From<reqwest::Error> for FunderError {
    fn from(err: reqwest::Error) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FunderError>;
