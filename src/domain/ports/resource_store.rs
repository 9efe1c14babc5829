//! Port for the host platform's resource store.

use async_trait::async_trait;

use crate::domain::errors::SyncResult;
use crate::domain::models::IssueResource;

/// Read-modify-write access to the authoritative resource store.
///
/// Updates are plain conditional writes, not transactions: a concurrent
/// external edit between read and write can be lost, which is accepted.
/// The store enforces the finalizer invariant — a resource whose deletion
/// has been requested is physically removed only once its finalizer list
/// is empty.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a resource by name. `None` means the resource is gone and
    /// there is nothing to reconcile.
    async fn get(&self, name: &str) -> SyncResult<Option<IssueResource>>;

    /// Persist metadata changes (the finalizer list in particular).
    async fn update(&self, resource: &IssueResource) -> SyncResult<()>;

    /// Persist the status subresource only.
    async fn update_status(&self, resource: &IssueResource) -> SyncResult<()>;

    /// Names of every resource currently in the store.
    async fn list_names(&self) -> SyncResult<Vec<String>>;
}
