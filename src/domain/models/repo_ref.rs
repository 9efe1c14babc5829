//! Repository reference parsing.

use std::fmt;

use crate::domain::errors::{SyncError, SyncResult};

/// An `owner/repo` coordinate pair for the remote tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoRef {
    /// Parse a repository reference from its string form.
    ///
    /// The last two non-empty `/`-separated segments are taken as owner and
    /// repo, so both `"owner/repo"` and a full
    /// `"https://github.com/owner/repo"` URL are accepted. Anything with
    /// fewer than two segments fails with [`SyncError::MalformedRepoRef`].
    pub fn parse(input: &str) -> SyncResult<Self> {
        let segments: Vec<&str> = input
            .trim()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if segments.len() < 2 {
            return Err(SyncError::MalformedRepoRef(input.to_string()));
        }

        Ok(Self {
            owner: segments[segments.len() - 2].to_string(),
            repo: segments[segments.len() - 1].to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
