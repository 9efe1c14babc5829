//! Domain view of an issue on the remote tracker.

use serde::{Deserialize, Serialize};

/// State of a remote issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parse a tracker state string. Unknown values are treated as open,
    /// matching how the tracker only ever reports the two states.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

/// Reference object present when a pull request is linked to the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// API URL of the linked pull request.
    pub url: String,
}

/// An issue as observed on the remote tracker.
///
/// Identity as seen by this engine is *by title*: the resource carries no
/// field remembering which remote number it created, and correspondence is
/// re-derived every cycle by scanning the remote list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteIssue {
    /// URL to view the issue.
    pub url: String,
    /// Sequential number within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body text (empty when the tracker reports none).
    #[serde(default)]
    pub body: String,
    /// Current state.
    pub state: IssueState,
    /// Present when a pull request is linked to this issue.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

impl RemoteIssue {
    pub fn has_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_state_parse() {
        assert_eq!(IssueState::parse("open"), IssueState::Open);
        assert_eq!(IssueState::parse("closed"), IssueState::Closed);
        assert_eq!(IssueState::parse("CLOSED"), IssueState::Closed);
        assert_eq!(IssueState::parse("anything"), IssueState::Open);
    }

    #[test]
    fn test_has_pull_request() {
        let mut issue = RemoteIssue {
            url: "https://github.com/o/r/issues/1".to_string(),
            number: 1,
            title: "T".to_string(),
            body: String::new(),
            state: IssueState::Open,
            pull_request: None,
        };
        assert!(!issue.has_pull_request());

        issue.pull_request = Some(PullRequestRef {
            url: "https://api.github.com/repos/o/r/pulls/2".to_string(),
        });
        assert!(issue.has_pull_request());
    }
}
