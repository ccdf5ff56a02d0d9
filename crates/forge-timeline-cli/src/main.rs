//! forge-timeline: print the merge request timeline of a project snapshot
//!
//! Logs go to stderr; the timeline itself is the only thing written to
//! stdout. Ctrl-C cancels the aggregation.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use forge_timeline::{ProjectId, TimelineBuilder};
use forge_timeline_cli::config::Config;
use forge_timeline_cli::output;
use forge_timeline_cli::snapshot::SnapshotSource;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let window = config.window()?;
    let project = ProjectId(config.project);

    let source = SnapshotSource::load(&config.snapshot)
        .with_context(|| format!("Failed to load {}", config.snapshot.display()))?;
    if source.project() != project {
        warn!(
            requested = %project,
            snapshot = %source.project(),
            "Snapshot belongs to a different project"
        );
    }

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });

    let builder = TimelineBuilder::new(config.timeline_options());
    let timeline = builder
        .build_with_cancellation(Arc::new(source), project, window, token)
        .await
        .with_context(|| format!("Failed to build timeline for project {project}"))?;

    if !timeline.is_complete() {
        warn!(skipped = timeline.skipped.len(), "Timeline is incomplete");
    }

    let rendered = output::render(&timeline, config.format)?;
    println!("{rendered}");
    Ok(())
}
