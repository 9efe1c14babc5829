//! issuesync - declarative issue reconciler.
//!
//! Keeps a single remote tracker issue in sync with a local declarative
//! resource: each reconcile cycle lists the remote issues, matches by
//! title, creates or updates as needed, and reports the outcome as status
//! conditions on the resource. A finalizer-based deletion protocol
//! guarantees the remote issue is closed before the resource is removed.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture:
//!
//! - **Domain layer** (`domain`): models, port traits, and the error taxonomy
//! - **Service layer** (`services`): the reconciliation engine, matcher,
//!   condition builder, controller loop, and the admission logger
//! - **Adapters** (`adapters`): the GitHub REST client, credential
//!   providers, and the in-memory resource store
//! - **Infrastructure** (`infrastructure`): configuration loading
//! - **CLI** (`cli`): command-line wiring

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{GitHubApiConfig, GitHubIssueClient, MemoryResourceStore};
pub use domain::errors::{SyncError, SyncResult};
pub use domain::models::{
    Condition, ConditionType, Config, IssueResource, IssueSpec, IssueState, LifecyclePhase,
    RemoteIssue, RepoRef, FINALIZER,
};
pub use domain::ports::{CredentialProvider, IssueService, ResourceStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Controller, ReconcileOutcome, Reconciler, SyncAction};
