//! Status conditions reported on a synced resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The condition types this reconciler reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    /// The remote issue is open.
    #[serde(rename = "OpenIssue")]
    OpenIssue,
    /// The remote issue has a linked pull request.
    #[serde(rename = "IssueHasPR")]
    IssueHasPr,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenIssue => "OpenIssue",
            Self::IssueHasPr => "IssueHasPR",
        }
    }
}

/// A named boolean status record with reason, message, and the time the
/// boolean last changed. Written only by the reconciler, read by external
/// observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Which sub-state this condition reports.
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    /// The observed boolean value.
    pub status: bool,
    /// Machine-readable reason for the current value.
    pub reason: String,
    /// Human-readable explanation.
    pub message: String,
    /// When `status` last changed value. Not bumped when a cycle observes
    /// the same value again.
    pub last_transition: DateTime<Utc>,
}

impl Condition {
    pub fn new(
        condition_type: ConditionType,
        status: bool,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            condition_type,
            status,
            reason: reason.into(),
            message: message.into(),
            last_transition: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_type_wire_names() {
        assert_eq!(ConditionType::OpenIssue.as_str(), "OpenIssue");
        assert_eq!(ConditionType::IssueHasPr.as_str(), "IssueHasPR");

        let json = serde_json::to_string(&ConditionType::IssueHasPr).unwrap();
        assert_eq!(json, "\"IssueHasPR\"");
    }

    #[test]
    fn test_condition_serializes_type_field() {
        let cond = Condition::new(
            ConditionType::OpenIssue,
            true,
            "IssueExists",
            "Issue is open",
            Utc::now(),
        );
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["type"], "OpenIssue");
        assert_eq!(json["status"], true);
        assert_eq!(json["reason"], "IssueExists");
    }
}
