//! Port for bearer-credential retrieval.

use async_trait::async_trait;

use crate::domain::errors::SyncResult;

/// Supplies the bearer token used to authenticate against the remote
/// tracker. Consulted once per remote call; a missing or empty credential
/// is a hard error for that reconcile cycle.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn token(&self) -> SyncResult<String>;
}
