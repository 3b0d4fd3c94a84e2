//! Clip pipeline worker binary.
//!
//! Runs one batch: discover, rank, then acquire, transcribe and select a clip
//! for each of the top candidates. Prints the batch results as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipscout_discovery::build_feed;
use clipscout_media::build_cli_adapters;
use clipscout_oracle::build_oracle;
use clipscout_worker::{Collaborators, PipelineOrchestrator, WorkerConfig};

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?
        .add_directive("clipscout=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    info!("Worker config: {:?}", config);

    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);

    let feed = build_feed(&config.discovery).context("failed to build discovery feed")?;
    let oracle = build_oracle(&config.oracle).context("failed to build scoring oracle")?;
    let (source, transcriber) = build_cli_adapters(&config.media, Some(cancel_rx.clone()));

    let orchestrator = PipelineOrchestrator::new(
        &config,
        Collaborators {
            feed,
            source: Arc::new(source),
            transcriber: Arc::new(transcriber),
            oracle,
        },
    )?
    .with_cancel(cancel_rx);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received shutdown signal, stopping after the current stage");
            let _ = cancel_tx.send(true);
        }
    });

    let results = orchestrator.run(config.max_items).await?;
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    info!(
        succeeded,
        failed = results.len() - succeeded,
        "Batch complete"
    );

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider was already installed");
    }

    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {:#}", e);
        std::process::exit(1);
    }

    info!("Starting clipscout-worker");

    if let Err(e) = run().await {
        error!("Worker failed: {:#}", e);
        std::process::exit(1);
    }

    info!("Worker shutdown complete");
}
