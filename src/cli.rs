//! Command-line interface and runtime wiring.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::{
    EnvCredentials, GitHubApiConfig, GitHubIssueClient, MemoryResourceStore,
    SecretFileCredentials,
};
use crate::domain::models::{Config, IssueResource};
use crate::domain::ports::CredentialProvider;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{AdmissionRequest, Controller, NamespaceAdmissionLogger, Reconciler};

/// issuesync - declarative issue reconciler.
#[derive(Debug, Parser)]
#[command(name = "issuesync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the controller loop.
    Run(RunArgs),

    /// Handle one namespace admission request from stdin.
    Admit(AdmitArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to a configuration file (defaults to the .issuesync/ chain).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of YAML resource manifests to seed the store with.
    #[arg(long)]
    pub manifests: Option<PathBuf>,

    /// Run a single reconcile pass and exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct AdmitArgs {
    /// Path to a configuration file (defaults to the .issuesync/ chain).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute the `admit` command: read one JSON admission request from
/// stdin, append it to the admission log, and print the verdict.
pub async fn admit(args: AdmitArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    init_tracing(&config);

    let mut raw = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut raw)
        .context("failed to read admission request from stdin")?;
    let request: AdmissionRequest =
        serde_json::from_str(&raw).context("failed to parse admission request")?;

    let logger = NamespaceAdmissionLogger::new(&config.admission.log_path);
    let response = logger.handle(&request).await;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Execute the `run` command.
pub async fn run(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    init_tracing(&config);

    let credentials: Arc<dyn CredentialProvider> = match &config.github.secret_dir {
        Some(dir) => Arc::new(SecretFileCredentials::new(
            dir,
            &config.github.secret_name,
            &config.github.secret_key,
        )),
        None => Arc::new(EnvCredentials::new(&config.github.token_env)),
    };

    let client = Arc::new(GitHubIssueClient::new(
        GitHubApiConfig::from(&config.github),
        credentials,
    ));

    let store = Arc::new(MemoryResourceStore::new());
    if let Some(dir) = &args.manifests {
        let resources = load_manifests(dir)?;
        tracing::info!(count = resources.len(), dir = %dir.display(), "loaded resource manifests");
        for resource in resources {
            store.insert(resource).await;
        }
    }

    let reconciler = Arc::new(Reconciler::new(store.clone(), client));
    let controller = Controller::new(
        reconciler,
        store,
        Duration::from_secs(config.controller.requeue_after_secs),
    );

    if args.once {
        controller.run_pass().await;
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    controller.run(shutdown_rx).await;
    Ok(())
}

/// Initialise the tracing subscriber from logging config.
///
/// `RUST_LOG` takes precedence over the configured level when set.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    } else {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

/// Load every YAML resource manifest in a directory.
pub fn load_manifests(dir: &Path) -> Result<Vec<IssueResource>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read manifest directory {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml")
            )
        })
        .collect();
    paths.sort();

    let mut resources = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let resource: IssueResource = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        resources.push(resource);
    }
    Ok(resources)
}
