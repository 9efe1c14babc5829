//! Fixed-interval controller loop.
//!
//! Drives the reconciler over every resource in the store on a fixed
//! cadence. One pass reconciles each resource sequentially, so two cycles
//! for the same resource never overlap; the interval doubles as the
//! requeue-after delay that catches external drift.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::ports::ResourceStore;
use crate::services::reconciler::Reconciler;

/// Runs reconcile passes until told to stop.
pub struct Controller {
    reconciler: Arc<Reconciler>,
    store: Arc<dyn ResourceStore>,
    requeue_after: Duration,
}

impl Controller {
    pub fn new(
        reconciler: Arc<Reconciler>,
        store: Arc<dyn ResourceStore>,
        requeue_after: Duration,
    ) -> Self {
        Self {
            reconciler,
            store,
            requeue_after,
        }
    }

    /// Run until the shutdown channel signals `true` or closes.
    ///
    /// The first pass runs immediately; each subsequent pass follows after
    /// `requeue_after`. Reconcile errors are logged and left to the next
    /// tick — the loop itself never dies on them.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.requeue_after);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            requeue_after_secs = self.requeue_after.as_secs(),
            "controller loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("controller loop stopping");
                        return;
                    }
                }
            }
        }
    }

    /// Reconcile every resource currently in the store once.
    pub async fn run_pass(&self) {
        let names = match self.store.list_names().await {
            Ok(names) => names,
            Err(err) => {
                tracing::error!(error = %err, "failed to list resources, skipping pass");
                return;
            }
        };

        for name in names {
            match self.reconciler.reconcile(&name).await {
                Ok(outcome) => {
                    tracing::debug!(resource = %name, outcome = ?outcome, "reconcile finished");
                }
                Err(err) => {
                    tracing::error!(
                        resource = %name,
                        error = %err,
                        "reconcile failed, retrying on next pass"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::MemoryResourceStore;
    use crate::domain::errors::SyncResult;
    use crate::domain::models::{IssueResource, IssueSpec, RemoteIssue, RepoRef};
    use crate::domain::ports::IssueService;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tracker double that accepts everything and counts creates.
    #[derive(Default)]
    struct CountingTracker {
        creates: AtomicUsize,
    }

    #[async_trait]
    impl IssueService for CountingTracker {
        async fn list_issues(&self, _repo: &RepoRef) -> SyncResult<Vec<RemoteIssue>> {
            Ok(Vec::new())
        }

        async fn create_issue(
            &self,
            _repo: &RepoRef,
            title: &str,
            body: &str,
        ) -> SyncResult<RemoteIssue> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(RemoteIssue {
                url: String::new(),
                number: 1,
                title: title.to_string(),
                body: body.to_string(),
                state: crate::domain::models::IssueState::Open,
                pull_request: None,
            })
        }

        async fn update_issue(
            &self,
            _repo: &RepoRef,
            _number: u64,
            _body: &str,
            _title: &str,
        ) -> SyncResult<RemoteIssue> {
            unreachable!("no update expected")
        }

        async fn close_issue(
            &self,
            _repo: &RepoRef,
            _spec: &IssueSpec,
        ) -> SyncResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_single_pass_reconciles_every_resource() {
        let store = Arc::new(MemoryResourceStore::new());
        for name in ["a", "b", "c"] {
            store
                .insert(IssueResource::new(
                    name,
                    IssueSpec {
                        repo: "octocat/hello-world".to_string(),
                        title: format!("Issue {name}"),
                        description: String::new(),
                    },
                ))
                .await;
        }

        let tracker = Arc::new(CountingTracker::default());
        let reconciler = Arc::new(Reconciler::new(store.clone(), tracker.clone()));
        let controller = Controller::new(reconciler, store, Duration::from_secs(60));

        controller.run_pass().await;
        assert_eq!(tracker.creates.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let store = Arc::new(MemoryResourceStore::new());
        let tracker = Arc::new(CountingTracker::default());
        let reconciler = Arc::new(Reconciler::new(store.clone(), tracker));
        let controller = Controller::new(reconciler, store, Duration::from_millis(10));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { controller.run(rx).await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop exits promptly")
            .unwrap();
    }
}
