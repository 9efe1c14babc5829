//! Port for the remote issue-tracking service.

use async_trait::async_trait;

use crate::domain::errors::SyncResult;
use crate::domain::models::{IssueSpec, RemoteIssue, RepoRef};

/// The four remote operations a reconcile cycle may perform.
///
/// Implementations own transport, authentication, and wire encoding; the
/// engine only sees domain types. Remote calls are synchronous from the
/// caller's point of view and honour the ambient task deadline.
#[async_trait]
pub trait IssueService: Send + Sync {
    /// List every issue the tracker reports for the repository.
    async fn list_issues(&self, repo: &RepoRef) -> SyncResult<Vec<RemoteIssue>>;

    /// Create a new open issue with the given title and body.
    async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str)
        -> SyncResult<RemoteIssue>;

    /// Replace the body (and title) of the numbered issue, keeping it open.
    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
        title: &str,
    ) -> SyncResult<RemoteIssue>;

    /// Close the issue matching the spec's title.
    ///
    /// Fails with [`SyncError::CloseTargetMissing`](crate::domain::errors::SyncError)
    /// when no issue with that title exists.
    async fn close_issue(&self, repo: &RepoRef, spec: &IssueSpec) -> SyncResult<()>;
}
