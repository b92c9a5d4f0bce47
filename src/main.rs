//! CLI entry point for the imgspider tool.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use imgspider_core::discovery::{ChromeRenderer, PageRenderer};
use imgspider_core::{
    CompletionCounter, DiscoverySettings, HttpClient, ReferenceQueue, WorkerPool, discover,
    spawn_feeder,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Imgspider starting");

    // Idempotent: tolerates an already-existing directory, and exists even
    // when discovery later fails fatally.
    let output_dir = args.save_dir.join(&args.key_word);
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    info!(dir = %output_dir.display(), "output directory ready");

    let quota = args.number as usize;

    // Discovery runs strictly before the pipeline, in this task.
    let mut renderer = ChromeRenderer::launch_headless().await?;
    let discovery_result = discover(
        &mut renderer,
        &args.key_word,
        quota,
        &DiscoverySettings::default(),
    )
    .await;
    renderer.close().await;
    let discovered = discovery_result?;

    info!(
        discovered = discovered.records.len(),
        malformed = discovered.malformed,
        rounds = discovered.rounds,
        "starting downloads"
    );

    let malformed = discovered.malformed;
    let (sender, queue) = ReferenceQueue::unbounded();
    let feeder = spawn_feeder(discovered.records, sender);

    let client = HttpClient::new();
    let counter = Arc::new(CompletionCounter::new(quota));
    let pool = WorkerPool::new(usize::from(args.workers))?;

    let stats = pool.run(queue, client, counter, &output_dir).await;

    // The feeder never blocks (unbounded queue) and is done by the time the
    // workers are; await it so task failures are not silently dropped.
    feeder.await?;

    info!(
        saved = stats.saved(),
        requested = quota,
        fetch_failed = stats.fetch_failed(),
        write_failed = stats.write_failed(),
        malformed_skipped = malformed,
        "harvest complete"
    );

    Ok(())
}
