//! Port trait definitions (hexagonal architecture).
//!
//! Async trait seams the engine depends on, implemented by adapters:
//! - [`IssueService`]: the remote tracker's four operations
//! - [`ResourceStore`]: the host platform's resource persistence
//! - [`CredentialProvider`]: bearer-token retrieval

pub mod credentials;
pub mod issue_service;
pub mod resource_store;

pub use credentials::CredentialProvider;
pub use issue_service::IssueService;
pub use resource_store::ResourceStore;
