//! Project identifier parsing.
//!
//! A project is identified by a GitHub-style slug (`owner/repo`). Input may
//! also be a full repository URL; the trailing two path segments are taken.

use serde::{Deserialize, Serialize};

use crate::error::{FunderError, Result};

/// Parsed `owner/repo` identifier for a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub owner: String,
    pub repo: String,
}

impl ProjectRef {
    /// Parse a bare slug (`georgetown-cset/funder-finder`) or a full URL
    /// (`https://github.com/georgetown-cset/funder-finder/`).
    ///
    /// Splits on `/`, discards empty segments, and takes the last two as
    /// owner and repo. Fails with `MalformedIdentifier` if fewer than two
    /// non-empty segments remain.
    pub fn parse(input: &str) -> Result<Self> {
        let segments: Vec<&str> = input
            .trim()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [.., owner, repo] => Ok(Self {
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            }),
            _ => Err(FunderError::MalformedIdentifier(input.to_string())),
        }
    }

    /// The `owner/repo` short form.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_slug() {
        let p = ProjectRef::parse("georgetown-cset/funder-finder").unwrap();
        assert_eq!(p.owner, "georgetown-cset");
        assert_eq!(p.repo, "funder-finder");
        assert_eq!(p.slug(), "georgetown-cset/funder-finder");
    }

    #[test]
    fn parses_full_url() {
        let p = ProjectRef::parse("https://github.com/tensorflow/tensorflow").unwrap();
        assert_eq!(p.owner, "tensorflow");
        assert_eq!(p.repo, "tensorflow");
    }

    #[test]
    fn tolerates_trailing_slash() {
        let p = ProjectRef::parse("https://github.com/pandas-dev/pandas/").unwrap();
        assert_eq!(p.owner, "pandas-dev");
        assert_eq!(p.repo, "pandas");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let p = ProjectRef::parse("  psf/requests \n").unwrap();
        assert_eq!(p.owner, "psf");
        assert_eq!(p.repo, "requests");
    }

    #[test]
    fn rejects_owner_only() {
        assert!(matches!(
            ProjectRef::parse("conda-forge"),
            Err(FunderError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(ProjectRef::parse("").is_err());
        assert!(ProjectRef::parse("///").is_err());
    }
}
