//! The reconciliation engine.
//!
//! One invocation converges a single resource toward its desired state:
//! fetch, deletion check, list + match, create-or-update, condition
//! write-back. The engine is stateless across invocations; everything it
//! needs to remember lives on the resource (finalizer, status). It
//! performs no retry or backoff of its own — every surfaced error is the
//! dispatcher's cue to requeue with backoff.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::SyncResult;
use crate::domain::models::{IssueResource, LifecyclePhase, RemoteIssue, RepoRef};
use crate::domain::ports::{IssueService, ResourceStore};
use crate::services::conditions::{apply_conditions, build_conditions};
use crate::services::matcher::find_issue;

/// What a successful convergence did to the remote issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// No remote issue matched the title; one was created.
    Created,
    /// The matched issue's body drifted from the spec; it was updated.
    Updated,
    /// The matched issue already agreed with the spec; no remote call.
    Unchanged,
}

/// Clean outcomes of a reconcile cycle.
///
/// The deletion-protocol exits (`Finalized`, `AlreadyDeleting`) are
/// ordinary variants here rather than sentinel errors: they end the cycle
/// without further action and must never be confused with real failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The remote issue now matches the spec and status was written back.
    Synced { action: SyncAction },
    /// The resource no longer exists; nothing to reconcile.
    Gone,
    /// Deletion was in progress and the remote issue has been closed; the
    /// finalizer was removed and the resource released for removal.
    Finalized,
    /// Deletion was requested but our finalizer is already gone — a raced
    /// deletion another cycle has handled.
    AlreadyDeleting,
}

/// Outcome of the deletion check, internal to the engine.
enum DeletionCheck {
    /// Not deleting; continue with normal convergence.
    Proceed,
    /// Cleanup ran to completion this cycle.
    Handled,
    /// Deletion already handled elsewhere.
    AlreadyHandled,
}

/// Reconciles desired-issue resources against the remote tracker.
pub struct Reconciler {
    store: Arc<dyn ResourceStore>,
    issues: Arc<dyn IssueService>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ResourceStore>, issues: Arc<dyn IssueService>) -> Self {
        Self { store, issues }
    }

    /// Run one reconcile cycle for the named resource.
    pub async fn reconcile(&self, name: &str) -> SyncResult<ReconcileOutcome> {
        let Some(mut resource) = self.store.get(name).await? else {
            tracing::debug!(resource = name, "resource not found, nothing to reconcile");
            return Ok(ReconcileOutcome::Gone);
        };

        match self.check_deletion(&mut resource).await? {
            DeletionCheck::Handled => return Ok(ReconcileOutcome::Finalized),
            DeletionCheck::AlreadyHandled => return Ok(ReconcileOutcome::AlreadyDeleting),
            DeletionCheck::Proceed => {}
        }

        let repo = RepoRef::parse(&resource.spec.repo)?;

        let issues = self.issues.list_issues(&repo).await.inspect_err(|err| {
            tracing::error!(resource = name, repo = %repo, error = %err, "failed to list remote issues");
        })?;
        let found = find_issue(&issues, &resource.spec.title);

        let (action, handled) = self.converge(&repo, &resource, found).await?;

        // On a no-op the matched snapshot still drives the conditions: the
        // resource is synchronized, status must keep reflecting the issue.
        let snapshot = handled.as_ref().or(found);
        let fresh = build_conditions(snapshot, Utc::now());
        apply_conditions(&mut resource.status.conditions, fresh);

        self.store
            .update_status(&resource)
            .await
            .inspect_err(|err| {
                tracing::error!(resource = name, error = %err, "failed to update resource status");
            })?;

        Ok(ReconcileOutcome::Synced { action })
    }

    /// Apply the finalizer-based deletion protocol.
    ///
    /// While the finalizer is present the remote issue is closed before
    /// the finalizer is removed, so the resource cannot be physically
    /// deleted with the remote side still open. A close failure leaves
    /// the finalizer in place; closing is idempotent, so the retry is
    /// safe.
    async fn check_deletion(&self, resource: &mut IssueResource) -> SyncResult<DeletionCheck> {
        match resource.phase() {
            LifecyclePhase::Active => {
                if resource.add_finalizer() {
                    self.store.update(resource).await?;
                    tracing::debug!(
                        resource = %resource.metadata.name,
                        "attached finalizer"
                    );
                }
                Ok(DeletionCheck::Proceed)
            }
            LifecyclePhase::Finalizing => {
                let repo = RepoRef::parse(&resource.spec.repo)?;
                self.issues
                    .close_issue(&repo, &resource.spec)
                    .await
                    .inspect_err(|err| {
                        tracing::error!(
                            resource = %resource.metadata.name,
                            repo = %repo,
                            error = %err,
                            "failed to close remote issue, finalizer retained"
                        );
                    })?;

                resource.remove_finalizer();
                self.store.update(resource).await?;
                tracing::info!(
                    resource = %resource.metadata.name,
                    repo = %repo,
                    title = %resource.spec.title,
                    "remote issue closed, resource released for deletion"
                );
                Ok(DeletionCheck::Handled)
            }
            LifecyclePhase::PendingDeletion => Ok(DeletionCheck::AlreadyHandled),
        }
    }

    /// Decide between create, update, and no-op for the matched issue.
    ///
    /// Returns the action taken and the issue the remote call handed back;
    /// `None` on the no-op branch.
    async fn converge(
        &self,
        repo: &RepoRef,
        resource: &IssueResource,
        found: Option<&RemoteIssue>,
    ) -> SyncResult<(SyncAction, Option<RemoteIssue>)> {
        let spec = &resource.spec;
        match found {
            None => {
                let created = self
                    .issues
                    .create_issue(repo, &spec.title, &spec.description)
                    .await
                    .inspect_err(|err| {
                        tracing::error!(repo = %repo, title = %spec.title, error = %err, "failed to create issue");
                    })?;
                tracing::info!(
                    repo = %repo,
                    number = created.number,
                    title = %spec.title,
                    "created remote issue"
                );
                Ok((SyncAction::Created, Some(created)))
            }
            Some(issue) if issue.body != spec.description => {
                let updated = self
                    .issues
                    .update_issue(repo, issue.number, &spec.description, &spec.title)
                    .await
                    .inspect_err(|err| {
                        tracing::error!(repo = %repo, number = issue.number, error = %err, "failed to update issue");
                    })?;
                tracing::info!(
                    repo = %repo,
                    number = issue.number,
                    "updated remote issue body"
                );
                Ok((SyncAction::Updated, Some(updated)))
            }
            Some(_) => Ok((SyncAction::Unchanged, None)),
        }
    }
}
