//! Condition derivation and status upsert.

use chrono::{DateTime, Utc};

use crate::domain::models::{Condition, ConditionType, RemoteIssue};

/// Derive the standard conditions from the outcome of a sync attempt.
///
/// `result` is the just-created, just-updated, or matched remote issue —
/// `None` only when no snapshot could be determined. `OpenIssue` is always
/// reported true: a failed create has already aborted the cycle before
/// conditions are derived, so reaching this point means the issue exists.
pub fn build_conditions(result: Option<&RemoteIssue>, now: DateTime<Utc>) -> Vec<Condition> {
    let open = Condition::new(
        ConditionType::OpenIssue,
        true,
        "IssueExists",
        "Issue is open",
        now,
    );

    let has_pr = result.is_some_and(RemoteIssue::has_pull_request);
    let pr = if has_pr {
        Condition::new(
            ConditionType::IssueHasPr,
            true,
            "IssueHasPrLink",
            "Issue has a linked pull request",
            now,
        )
    } else {
        Condition::new(
            ConditionType::IssueHasPr,
            false,
            "IssueHasNoPr",
            "Issue does not have a linked pull request",
            now,
        )
    };

    vec![open, pr]
}

/// Upsert freshly derived conditions into the existing set, by type.
///
/// Reason and message are always refreshed; `last_transition` is carried
/// over from the existing record when the boolean status did not change,
/// so steady-state cycles produce no timestamp churn.
pub fn apply_conditions(existing: &mut Vec<Condition>, fresh: Vec<Condition>) {
    for incoming in fresh {
        match existing
            .iter_mut()
            .find(|c| c.condition_type == incoming.condition_type)
        {
            Some(current) => {
                if current.status == incoming.status {
                    current.reason = incoming.reason;
                    current.message = incoming.message;
                } else {
                    *current = incoming;
                }
            }
            None => existing.push(incoming),
        }
    }
}
