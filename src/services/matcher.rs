//! Title-based issue matching.

use crate::domain::models::RemoteIssue;

/// Find the remote issue whose title equals `title`.
///
/// Deterministic linear scan in list order; the first exact,
/// case-sensitive match wins. When the tracker contains duplicate titles
/// only the earliest-listed one is ever addressed — an accepted limitation
/// of title-based identity, not something to paper over here.
pub fn find_issue<'a>(issues: &'a [RemoteIssue], title: &str) -> Option<&'a RemoteIssue> {
    issues.iter().find(|issue| issue.title == title)
}
