//! The declarative issue resource and its lifecycle.
//!
//! The resource is owned by the host platform's store and mutated by users
//! and other controllers; this engine only ever touches its finalizer list
//! and its status subresource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::condition::Condition;

/// Finalizer tag this engine attaches to resources it manages.
///
/// While this tag is present and deletion has been requested, the store must
/// not physically remove the resource.
pub const FINALIZER: &str = "issues.issuesync.dev/close-remote";

/// Resource identity and lifecycle markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    /// Unique resource name within the store.
    pub name: String,
    /// Set by the platform when deletion of the resource is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_requested_at: Option<DateTime<Utc>>,
    /// String tags blocking physical deletion until cleared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

/// Desired state: which remote issue should exist and what it should say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSpec {
    /// Remote repository as `owner/repo`.
    pub repo: String,
    /// Title of the issue; also its identity on the remote side.
    pub title: String,
    /// Desired issue body.
    #[serde(default)]
    pub description: String,
}

/// Observed state written back by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// A desired-issue resource: metadata, spec, and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueResource {
    pub metadata: ResourceMeta,
    pub spec: IssueSpec,
    #[serde(default)]
    pub status: IssueStatus,
}

/// Lifecycle of a resource as observed at the start of a reconcile cycle,
/// derived from the deletion marker and the finalizer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// No deletion requested; normal convergence applies.
    Active,
    /// Deletion requested and our finalizer is no longer present; another
    /// cycle already ran the cleanup.
    PendingDeletion,
    /// Deletion requested while our finalizer is present; remote cleanup
    /// has not yet been confirmed.
    Finalizing,
}

impl IssueResource {
    /// Create a resource with the given name and spec, no lifecycle markers.
    pub fn new(name: impl Into<String>, spec: IssueSpec) -> Self {
        Self {
            metadata: ResourceMeta {
                name: name.into(),
                deletion_requested_at: None,
                finalizers: Vec::new(),
            },
            spec,
            status: IssueStatus::default(),
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        if self.metadata.deletion_requested_at.is_none() {
            LifecyclePhase::Active
        } else if self.has_finalizer() {
            LifecyclePhase::Finalizing
        } else {
            LifecyclePhase::PendingDeletion
        }
    }

    pub fn has_finalizer(&self) -> bool {
        self.metadata.finalizers.iter().any(|f| f == FINALIZER)
    }

    /// Add our finalizer tag. Returns `true` when it was not already present.
    pub fn add_finalizer(&mut self) -> bool {
        if self.has_finalizer() {
            return false;
        }
        self.metadata.finalizers.push(FINALIZER.to_string());
        true
    }

    /// Remove our finalizer tag. Returns `true` when it was present.
    pub fn remove_finalizer(&mut self) -> bool {
        let before = self.metadata.finalizers.len();
        self.metadata.finalizers.retain(|f| f != FINALIZER);
        self.metadata.finalizers.len() != before
    }
}
