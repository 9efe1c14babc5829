//! Namespace admission logger.
//!
//! An unrelated collaborator: it intercepts namespace create/update/delete
//! operations, appends a JSON line identifying the requesting actor to a
//! log file, and allows the operation. It never rejects an operation on
//! policy grounds and shares no data with the reconciliation engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

/// Operation performed on a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdmissionOperation {
    Create,
    Update,
    Delete,
}

impl AdmissionOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// An intercepted namespace operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// Identity of the requesting actor.
    pub user: String,
    /// What the actor is doing.
    pub operation: AdmissionOperation,
    /// The namespace being operated on.
    pub namespace: String,
}

/// Verdict returned to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionResponse {
    pub allowed: bool,
    pub message: String,
}

/// The record appended to the log file, one JSON object per line.
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    user: &'a str,
    operation: AdmissionOperation,
}

/// Appends one JSON line per intercepted namespace operation.
#[derive(Debug, Clone)]
pub struct NamespaceAdmissionLogger {
    log_path: PathBuf,
}

impl NamespaceAdmissionLogger {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// Record the request and allow it.
    ///
    /// A write failure produces an errored response; it never blocks the
    /// operation for policy reasons.
    pub async fn handle(&self, request: &AdmissionRequest) -> AdmissionResponse {
        match self.append(request).await {
            Ok(()) => AdmissionResponse {
                allowed: true,
                message: format!(
                    "recorded {} by {}",
                    request.operation.as_str(),
                    request.user
                ),
            },
            Err(err) => {
                tracing::error!(
                    user = %request.user,
                    operation = request.operation.as_str(),
                    error = %err,
                    "failed to write admission log entry"
                );
                AdmissionResponse {
                    allowed: false,
                    message: format!("failed to write admission log entry: {err}"),
                }
            }
        }
    }

    async fn append(&self, request: &AdmissionRequest) -> std::io::Result<()> {
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let record = LogRecord {
            user: &request.user,
            operation: request.operation,
        };
        let mut line = serde_json::to_string(&record).map_err(std::io::Error::other)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.log_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
