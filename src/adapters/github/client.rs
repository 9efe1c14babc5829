//! GitHub HTTP client.
//!
//! Implements the [`IssueService`] port against the tracker's REST API v3,
//! using the structured-JSON protocol headers and the upstream
//! patch-via-post convention for single-issue updates.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{GitHubConfig, IssueSpec, RemoteIssue, RepoRef};
use crate::domain::ports::{CredentialProvider, IssueService};
use crate::services::matcher::find_issue;

use super::models::{IssuePayload, IssueRequest};

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const CONTENT_TYPE_HEADER: &str = "application/json";

/// Immutable API coordinates for the tracker.
///
/// Passed in at construction; there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct GitHubApiConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// User agent sent on every request.
    pub user_agent: String,
}

impl Default for GitHubApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            user_agent: "issuesync".to_string(),
        }
    }
}

impl From<&GitHubConfig> for GitHubApiConfig {
    fn from(config: &GitHubConfig) -> Self {
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client for the tracker's issues API.
#[derive(Clone)]
pub struct GitHubIssueClient {
    /// The underlying HTTP client.
    http: Client,
    /// API coordinates.
    api: GitHubApiConfig,
    /// Bearer-token source, consulted per request.
    credentials: Arc<dyn CredentialProvider>,
}

impl GitHubIssueClient {
    pub fn new(api: GitHubApiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: Client::new(),
            api,
            credentials,
        }
    }

    /// URL of the issue collection endpoint.
    fn collection_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}/issues", self.api.base_url, repo.owner, repo.repo)
    }

    /// URL of a single issue.
    fn item_url(&self, repo: &RepoRef, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}",
            self.api.base_url, repo.owner, repo.repo, number
        )
    }

    /// Build an authorized request with the protocol headers set.
    async fn authorized(&self, method: Method, url: &str) -> SyncResult<reqwest::RequestBuilder> {
        let token = self.credentials.token().await?;
        Ok(self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", ACCEPT_HEADER)
            .header("Content-Type", CONTENT_TYPE_HEADER)
            .header("User-Agent", &self.api.user_agent))
    }

    /// Surface a non-success response as [`SyncError::RemoteStatus`].
    async fn check_status(response: reqwest::Response) -> SyncResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }

    /// POST an issue mutation and decode the returned issue object.
    async fn post_issue(&self, url: &str, request: &IssueRequest) -> SyncResult<RemoteIssue> {
        let response = self
            .authorized(Method::POST, url)
            .await?
            .json(request)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let payload = response
            .json::<IssuePayload>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(payload.into())
    }
}

#[async_trait]
impl IssueService for GitHubIssueClient {
    async fn list_issues(&self, repo: &RepoRef) -> SyncResult<Vec<RemoteIssue>> {
        let url = self.collection_url(repo);
        let response = self
            .authorized(Method::GET, &url)
            .await?
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteStatus { status, body });
        }

        let payloads = response
            .json::<Vec<IssuePayload>>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(payloads.into_iter().map(Into::into).collect())
    }

    async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> SyncResult<RemoteIssue> {
        let url = self.collection_url(repo);
        self.post_issue(&url, &IssueRequest::open(title, body)).await
    }

    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
        title: &str,
    ) -> SyncResult<RemoteIssue> {
        let url = self.item_url(repo, number);
        self.post_issue(&url, &IssueRequest::open(title, body)).await
    }

    async fn close_issue(&self, repo: &RepoRef, spec: &IssueSpec) -> SyncResult<()> {
        let issues = self.list_issues(repo).await?;

        let Some(found) = find_issue(&issues, &spec.title) else {
            return Err(SyncError::CloseTargetMissing);
        };

        let url = self.item_url(repo, found.number);
        self.post_issue(&url, &IssueRequest::closed(&spec.title, &spec.description))
            .await?;
        Ok(())
    }
}
