//! Bucketsync daemon
//!
//! Watches a local folder and mirrors it into an S3 bucket. Run with:
//! `bucketsync --bucket my-bucket --root ~/Documents/cloud watch`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucketsync::store::S3Store;
use bucketsync::sync::{translate, SyncEngine};
use bucketsync::types::{ChangeEvent, SyncConfig};
use bucketsync::watch::FsWatcher;

#[derive(Parser, Debug)]
#[command(name = "bucketsync")]
#[command(about = "Mirror a local folder into an S3 bucket")]
#[command(version)]
struct Cli {
    /// S3 bucket to mirror into
    #[arg(long, env = "BUCKETSYNC_BUCKET")]
    bucket: String,

    /// Local folder to mirror
    #[arg(long, env = "BUCKETSYNC_ROOT")]
    root: String,

    /// AWS region override (defaults to ambient AWS configuration)
    #[arg(long, env = "BUCKETSYNC_REGION")]
    region: Option<String>,

    /// Seconds between reconciliation passes
    #[arg(long, env = "BUCKETSYNC_RECONCILE_INTERVAL", default_value = "300")]
    reconcile_interval_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the folder and sync continuously (default)
    Watch,
    /// Run a single reconciliation pass and exit
    Reconcile {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Expand ~ in path
    let root = PathBuf::from(shellexpand::tilde(&cli.root).into_owned());

    let config = SyncConfig {
        bucket: cli.bucket,
        root,
        region: cli.region,
        reconcile_interval: Duration::from_secs(cli.reconcile_interval_secs),
    };

    // The root must exist before any subscription or reconciliation starts
    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::from(1);
    }

    let remote = Arc::new(S3Store::connect(config.bucket.clone(), config.region.clone()).await);
    let engine = Arc::new(SyncEngine::new(config, remote));

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => run_watch(engine).await,
        Command::Reconcile { json } => run_reconcile_once(engine, json).await,
    }
}

/// One-shot reconciliation, report on stdout
async fn run_reconcile_once(engine: Arc<SyncEngine>, json: bool) -> ExitCode {
    match engine.reconcile().await {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(e) => {
                        error!(error = %e, "cannot render report");
                        return ExitCode::from(1);
                    }
                }
            } else {
                println!(
                    "downloaded {} file(s), deleted {} local file(s), {} error(s)",
                    report.downloaded,
                    report.deleted_locally,
                    report.errors.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "reconciliation failed");
            ExitCode::from(1)
        }
    }
}

/// Continuous sync: live events plus the reconciliation timer
async fn run_watch(engine: Arc<SyncEngine>) -> ExitCode {
    let config = engine.config().clone();

    let (watcher, mut events) = match FsWatcher::subscribe(&config.root) {
        Ok(subscription) => subscription,
        Err(e) => {
            error!(error = %e, "cannot subscribe to filesystem notifications");
            return ExitCode::from(1);
        }
    };

    info!(
        root = %config.root.display(),
        bucket = %config.bucket,
        "watching for changes"
    );

    // Periodic reconciliation on its own task. The first tick fires
    // immediately and repairs startup drift; an in-flight pass always runs
    // to completion before shutdown is observed.
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let reconcile_engine = Arc::clone(&engine);
    let reconciler = tokio::spawn(async move {
        let mut timer = tokio::time::interval(reconcile_engine.config().reconcile_interval);
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Err(e) = reconcile_engine.reconcile().await {
                        warn!(error = %e, "reconciliation pass failed");
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }
    });

    // Sequential event worker: one action at a time. The select only
    // observes the interrupt between actions, so the current one finishes.
    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => handle_event(&engine, event).await,
                    None => {
                        warn!("watch stream ended");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = reconciler.await;
    drop(watcher);

    ExitCode::SUCCESS
}

/// Translate and apply one live event. Errors are logged and dropped; the
/// next reconciliation pass closes any gap they leave.
async fn handle_event(engine: &SyncEngine, event: ChangeEvent) {
    let action = match translate(&event, engine.config()) {
        Ok(Some(action)) => action,
        Ok(None) => return,
        Err(e) => {
            warn!(path = %event.path.display(), error = %e, "cannot translate event");
            return;
        }
    };

    if let Err(e) = engine.apply(&action).await {
        warn!(action = action.kind(), error = %e, "sync action failed");
    }
}
