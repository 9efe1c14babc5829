//! Domain errors for the issuesync reconciler.

use thiserror::Error;

/// Errors surfaced by a reconcile cycle or one of its collaborators.
///
/// Every variant except [`SyncError::ResourceNotFound`] aborts the cycle and
/// is returned to the dispatcher so its backoff-and-requeue applies. The
/// deletion-protocol clean exits ("already handled", "may already be
/// deleted") are *not* errors; they are modelled as
/// [`ReconcileOutcome`](crate::services::reconciler::ReconcileOutcome)
/// variants and never appear here.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("malformed repository reference: '{0}' (expected 'owner/repo')")]
    MalformedRepoRef(String),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("remote service returned status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("remote request failed: {0}")]
    Transport(String),

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("issue not found")]
    CloseTargetMissing,

    #[error("persistence error: {0}")]
    Persistence(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}
