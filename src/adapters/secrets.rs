//! Credential-provider adapters.
//!
//! Three sources for the tracker bearer token: a mounted secret volume, an
//! environment variable, and a static token for wiring tests.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::ports::CredentialProvider;

/// Reads a named secret keyed by a fixed key name from a mounted secret
/// directory: `{dir}/{secret_name}/{key}`.
///
/// The file is read on every request so a rotated secret is picked up
/// without a restart. A missing file or an empty token is a hard error for
/// the cycle that needed it.
#[derive(Debug, Clone)]
pub struct SecretFileCredentials {
    dir: PathBuf,
    secret_name: String,
    key: String,
}

impl SecretFileCredentials {
    pub fn new(
        dir: impl Into<PathBuf>,
        secret_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            secret_name: secret_name.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for SecretFileCredentials {
    async fn token(&self) -> SyncResult<String> {
        let path = self.dir.join(&self.secret_name).join(&self.key);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            SyncError::Credential(format!(
                "unable to read secret '{}' key '{}': {e}",
                self.secret_name, self.key
            ))
        })?;

        let token = raw.trim().to_string();
        if token.is_empty() {
            return Err(SyncError::Credential(format!(
                "secret '{}' key '{}' is empty",
                self.secret_name, self.key
            )));
        }
        Ok(token)
    }
}

/// Reads the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    async fn token(&self) -> SyncResult<String> {
        let token = std::env::var(&self.var)
            .map_err(|_| SyncError::Credential(format!("{} is not set", self.var)))?;
        if token.is_empty() {
            return Err(SyncError::Credential(format!("{} is empty", self.var)));
        }
        Ok(token)
    }
}

/// A fixed token, for tests and local wiring.
#[derive(Debug, Clone)]
pub struct StaticTokenCredentials {
    token: String,
}

impl StaticTokenCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenCredentials {
    async fn token(&self) -> SyncResult<String> {
        Ok(self.token.clone())
    }
}
