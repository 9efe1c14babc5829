//! GitHub Issues adapter.
//!
//! Concrete [`IssueService`](crate::domain::ports::IssueService)
//! implementation for a GitHub-shaped REST tracker, plus its wire models.

pub mod client;
pub mod models;

pub use client::{GitHubApiConfig, GitHubIssueClient};
