//! Domain models: the declarative resource, its conditions, and the
//! remote-tracker entities it is reconciled against.

pub mod condition;
pub mod config;
pub mod remote_issue;
pub mod repo_ref;
pub mod resource;

pub use condition::{Condition, ConditionType};
pub use config::{AdmissionConfig, Config, ControllerConfig, GitHubConfig, LoggingConfig};
pub use remote_issue::{IssueState, PullRequestRef, RemoteIssue};
pub use repo_ref::RepoRef;
pub use resource::{IssueResource, IssueSpec, IssueStatus, LifecyclePhase, ResourceMeta, FINALIZER};
