//! Integration tests for the reconcile cycle against a mock tracker API.
//!
//! Each test wires the real GitHub adapter to a mockito server and the
//! in-memory resource store, then drives whole reconcile cycles and
//! asserts on the HTTP traffic and the persisted resource state.

use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use issuesync::adapters::StaticTokenCredentials;
use issuesync::{
    ConditionType, GitHubApiConfig, GitHubIssueClient, IssueResource, IssueSpec,
    MemoryResourceStore, ReconcileOutcome, Reconciler, ResourceStore, SyncAction, SyncError,
};

const REPO: &str = "octocat/hello-world";
const ISSUES_PATH: &str = "/repos/octocat/hello-world/issues";

fn resource(name: &str) -> IssueResource {
    IssueResource::new(
        name,
        IssueSpec {
            repo: REPO.to_string(),
            title: "Test Issue".to_string(),
            description: "This is a test issue".to_string(),
        },
    )
}

fn issue_payload(number: u64, title: &str, body: &str, with_pr: bool) -> serde_json::Value {
    let mut payload = json!({
        "number": number,
        "title": title,
        "body": body,
        "state": "open",
        "html_url": format!("https://github.com/octocat/hello-world/issues/{number}"),
    });
    if with_pr {
        payload["pull_request"] = json!({
            "url": format!("https://api.github.com/repos/octocat/hello-world/pulls/{number}"),
        });
    }
    payload
}

fn reconciler_with(server: &ServerGuard, store: Arc<MemoryResourceStore>) -> Reconciler {
    let client = GitHubIssueClient::new(
        GitHubApiConfig {
            base_url: server.url(),
            user_agent: "issuesync-test".to_string(),
        },
        Arc::new(StaticTokenCredentials::new("test-token")),
    );
    Reconciler::new(store, Arc::new(client))
}

async fn setup(server: &ServerGuard) -> (Arc<MemoryResourceStore>, Reconciler) {
    let store = Arc::new(MemoryResourceStore::new());
    let reconciler = reconciler_with(server, store.clone());
    (store, reconciler)
}

fn condition<'a>(
    resource: &'a IssueResource,
    ty: ConditionType,
) -> &'a issuesync::Condition {
    resource
        .status
        .conditions
        .iter()
        .find(|c| c.condition_type == ty)
        .expect("condition present")
}

#[tokio::test]
async fn test_creation_issues_exactly_one_create_call() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", ISSUES_PATH)
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/vnd.github.v3+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let create = server
        .mock("POST", ISSUES_PATH)
        .match_body(Matcher::Json(json!({
            "title": "Test Issue",
            "body": "This is a test issue",
            "state": "open",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(issue_payload(100, "Test Issue", "This is a test issue", false).to_string())
        .expect(1)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    let outcome = reconciler.reconcile("demo").await.unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::Synced {
            action: SyncAction::Created
        }
    );

    list.assert_async().await;
    create.assert_async().await;

    let stored = store.get("demo").await.unwrap().unwrap();
    assert!(stored.has_finalizer());
    assert!(condition(&stored, ConditionType::OpenIssue).status);
    assert!(!condition(&stored, ConditionType::IssueHasPr).status);
}

#[tokio::test]
async fn test_idempotence_second_pass_makes_no_remote_mutations() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_payload(1, "Test Issue", "This is a test issue", false)]).to_string(),
        )
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", ISSUES_PATH)
        .expect(0)
        .create_async()
        .await;
    let update = server
        .mock("POST", format!("{ISSUES_PATH}/1").as_str())
        .expect(0)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    reconciler.reconcile("demo").await.unwrap();
    let first = store.get("demo").await.unwrap().unwrap().status;

    let outcome = reconciler.reconcile("demo").await.unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::Synced {
            action: SyncAction::Unchanged
        }
    );

    create.assert_async().await;
    update.assert_async().await;

    // Status, transition timestamps included, did not churn.
    let second = store.get("demo").await.unwrap().unwrap().status;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_on_drift_targets_matched_issue_number() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([issue_payload(5, "Test Issue", "Old", false)]).to_string())
        .create_async()
        .await;
    let create = server
        .mock("POST", ISSUES_PATH)
        .expect(0)
        .create_async()
        .await;
    let update = server
        .mock("POST", format!("{ISSUES_PATH}/5").as_str())
        .match_body(Matcher::Json(json!({
            "title": "Test Issue",
            "body": "This is a test issue",
            "state": "open",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(issue_payload(5, "Test Issue", "This is a test issue", false).to_string())
        .expect(1)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    let outcome = reconciler.reconcile("demo").await.unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::Synced {
            action: SyncAction::Updated
        }
    );

    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_no_op_still_reports_conditions_from_matched_issue() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_payload(9, "Test Issue", "This is a test issue", true)]).to_string(),
        )
        .create_async()
        .await;
    let mutations = server
        .mock("POST", Matcher::Regex("^/repos/.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    reconciler.reconcile("demo").await.unwrap();
    mutations.assert_async().await;

    // The matched snapshot drives the conditions even without a remote call.
    let stored = store.get("demo").await.unwrap().unwrap();
    assert!(condition(&stored, ConditionType::OpenIssue).status);
    assert!(condition(&stored, ConditionType::IssueHasPr).status);
}

#[tokio::test]
async fn test_deletion_closes_matching_issue_and_releases_resource() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_payload(7, "Test Issue", "This is a test issue", false)]).to_string(),
        )
        .create_async()
        .await;
    let close = server
        .mock("POST", format!("{ISSUES_PATH}/7").as_str())
        .match_body(Matcher::Json(json!({
            "title": "Test Issue",
            "body": "This is a test issue",
            "state": "closed",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(issue_payload(7, "Test Issue", "This is a test issue", false).to_string())
        .expect(1)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    let mut r = resource("demo");
    r.add_finalizer();
    store.insert(r).await;
    store.request_deletion("demo").await.unwrap();

    let outcome = reconciler.reconcile("demo").await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Finalized);

    close.assert_async().await;
    assert!(!store.contains("demo").await);
}

#[tokio::test]
async fn test_deletion_with_missing_issue_retains_finalizer() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    let mut r = resource("demo");
    r.add_finalizer();
    store.insert(r).await;
    store.request_deletion("demo").await.unwrap();

    let err = reconciler.reconcile("demo").await.unwrap_err();
    assert!(matches!(err, SyncError::CloseTargetMissing));

    let stored = store.get("demo").await.unwrap().unwrap();
    assert!(stored.has_finalizer());
}

#[tokio::test]
async fn test_malformed_repo_fails_before_any_remote_call() {
    let mut server = Server::new_async().await;
    let any_request = server
        .mock("GET", Matcher::Regex("^/.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store
        .insert(IssueResource::new(
            "demo",
            IssueSpec {
                repo: "not-a-valid-ref".to_string(),
                title: "Test Issue".to_string(),
                description: "This is a test issue".to_string(),
            },
        ))
        .await;

    let err = reconciler.reconcile("demo").await.unwrap_err();
    assert!(matches!(err, SyncError::MalformedRepoRef(_)));
    any_request.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_surfaces_status_code() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", ISSUES_PATH)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    let err = reconciler.reconcile("demo").await.unwrap_err();
    match err {
        SyncError::RemoteStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected RemoteStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pr_condition_transition_updates_timestamp_only_on_change() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_payload(3, "Test Issue", "This is a test issue", false)]).to_string(),
        )
        .create_async()
        .await;

    let (store, reconciler) = setup(&server).await;
    store.insert(resource("demo")).await;

    reconciler.reconcile("demo").await.unwrap();
    let before = store.get("demo").await.unwrap().unwrap();
    let pr_before = condition(&before, ConditionType::IssueHasPr).clone();
    assert!(!pr_before.status);

    // A pull request gets linked upstream.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let mut linked_server = Server::new_async().await;
    linked_server
        .mock("GET", ISSUES_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_payload(3, "Test Issue", "This is a test issue", true)]).to_string(),
        )
        .expect(2)
        .create_async()
        .await;
    let reconciler = reconciler_with(&linked_server, store.clone());

    reconciler.reconcile("demo").await.unwrap();
    let linked = store.get("demo").await.unwrap().unwrap();
    let pr_linked = condition(&linked, ConditionType::IssueHasPr).clone();
    assert!(pr_linked.status);
    assert!(pr_linked.last_transition > pr_before.last_transition);

    // Steady state: the timestamp does not churn.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    reconciler.reconcile("demo").await.unwrap();
    let steady = store.get("demo").await.unwrap().unwrap();
    assert_eq!(
        condition(&steady, ConditionType::IssueHasPr).last_transition,
        pr_linked.last_transition
    );
}
