//! GitHub Issues API request and response payloads.
//!
//! These structs map to the tracker's REST JSON wire format. They are used
//! internally by the GitHub adapter and are not part of the domain model.

use serde::{Deserialize, Serialize};

use crate::domain::models::{IssueState, PullRequestRef, RemoteIssue};

/// Request body for creating, updating, or closing an issue.
///
/// The tracker accepts the same shape on the collection endpoint (create)
/// and the single-item endpoint (update/close); only `state` differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue body text.
    pub body: String,
    /// Desired state: "open" or "closed".
    pub state: String,
}

impl IssueRequest {
    pub fn open(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            state: IssueState::Open.as_str().to_string(),
        }
    }

    pub fn closed(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            state: IssueState::Closed.as_str().to_string(),
        }
    }
}

/// An issue object as returned by the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePayload {
    /// Sequential number within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body text (may be absent or null).
    #[serde(default)]
    pub body: Option<String>,
    /// Current state: "open" or "closed".
    pub state: String,
    /// URL to view the issue in the tracker UI.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Present when a pull request is linked to this issue.
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
}

/// Pull-request reference object on an issue payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestPayload {
    /// API URL of the pull request resource.
    pub url: String,
}

impl From<IssuePayload> for RemoteIssue {
    fn from(payload: IssuePayload) -> Self {
        Self {
            url: payload.html_url.unwrap_or_default(),
            number: payload.number,
            title: payload.title,
            body: payload.body.unwrap_or_default(),
            state: IssueState::parse(&payload.state),
            pull_request: payload.pull_request.map(|pr| PullRequestRef { url: pr.url }),
        }
    }
}
