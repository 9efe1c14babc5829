//! In-memory resource store.
//!
//! Stands in for the host platform's resource persistence in the
//! standalone runtime and in tests. Deletion follows the platform
//! contract: requesting deletion of a resource that carries finalizers
//! only marks it, and physical removal happens when the last finalizer is
//! cleared.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::IssueResource;
use crate::domain::ports::ResourceStore;

/// A `ResourceStore` backed by an in-process map.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    inner: RwLock<HashMap<String, IssueResource>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource (the platform-side create/apply).
    pub async fn insert(&self, resource: IssueResource) {
        let mut map = self.inner.write().await;
        map.insert(resource.metadata.name.clone(), resource);
    }

    /// Request deletion of a resource, as the platform would: mark it when
    /// finalizers are present, remove it outright otherwise.
    pub async fn request_deletion(&self, name: &str) -> SyncResult<()> {
        let mut map = self.inner.write().await;
        let Some(resource) = map.get_mut(name) else {
            return Err(SyncError::ResourceNotFound(name.to_string()));
        };

        if resource.metadata.finalizers.is_empty() {
            map.remove(name);
        } else if resource.metadata.deletion_requested_at.is_none() {
            resource.metadata.deletion_requested_at = Some(Utc::now());
        }
        Ok(())
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.inner.read().await.contains_key(name)
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn get(&self, name: &str) -> SyncResult<Option<IssueResource>> {
        Ok(self.inner.read().await.get(name).cloned())
    }

    async fn update(&self, resource: &IssueResource) -> SyncResult<()> {
        let mut map = self.inner.write().await;
        let name = &resource.metadata.name;
        if !map.contains_key(name) {
            return Err(SyncError::Persistence(format!(
                "resource '{name}' no longer exists"
            )));
        }

        // Clearing the last finalizer on a deletion-marked resource lets
        // the platform remove it physically.
        if resource.metadata.deletion_requested_at.is_some()
            && resource.metadata.finalizers.is_empty()
        {
            map.remove(name);
        } else {
            map.insert(name.clone(), resource.clone());
        }
        Ok(())
    }

    async fn update_status(&self, resource: &IssueResource) -> SyncResult<()> {
        let mut map = self.inner.write().await;
        let name = &resource.metadata.name;
        let Some(stored) = map.get_mut(name) else {
            return Err(SyncError::Persistence(format!(
                "resource '{name}' no longer exists"
            )));
        };
        stored.status = resource.status.clone();
        Ok(())
    }

    async fn list_names(&self) -> SyncResult<Vec<String>> {
        let mut names: Vec<String> = self.inner.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
