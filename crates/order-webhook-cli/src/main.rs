#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod host;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use order_webhook::reqwest::ReqwestClient;
use order_webhook::{DispatchOutcome, OrderDispatcher};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::Cli;
use crate::host::{EventSnapshot, JsonOrderWriter};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "order_webhook_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "order_webhook_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "order_webhook_cli::config";
pub const TRACING_TARGET_HOST: &str = "order_webhook_cli::host";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "order event handled"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "order event handling failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let snapshot = read_snapshot(&cli).await?;
    let (mut event, customers, session) = snapshot.into_parts();

    let client = ReqwestClient::new(cli.http.clone()).context("failed to create HTTP client")?;
    let dispatcher = OrderDispatcher::new(
        client.into_service(),
        Arc::new(cli.webhook.store_config()),
        Arc::new(session),
        Arc::new(customers),
        Arc::new(JsonOrderWriter::new(cli.output.clone())),
    )
    .with_export_policy(cli.webhook.export_policy());

    let outcome = dispatcher
        .handle(&mut event)
        .await
        .context("failed to dispatch order event")?;

    log_outcome(event.order.entity_id, &outcome);
    Ok(())
}

/// Reads the order event snapshot from the input file or stdin.
async fn read_snapshot(cli: &Cli) -> anyhow::Result<EventSnapshot> {
    let bytes = match &cli.input {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_to_end(tokio::io::stdin())
            .await
            .context("failed to read stdin")?,
    };

    EventSnapshot::from_slice(&bytes).context("invalid order event snapshot")
}

/// Drains a reader on the runtime instead of blocking a worker thread.
async fn read_to_end<R>(mut reader: R) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

/// Logs what happened to the event.
fn log_outcome(order_id: u64, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Delivered(result) => tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            order_id,
            status_code = result.status,
            body = %result.body,
            "Order webhook delivered"
        ),
        DispatchOutcome::Skipped(reason) => tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            order_id,
            reason = %reason,
            "Order webhook skipped"
        ),
        DispatchOutcome::AlreadySent => tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            order_id,
            "Order webhook already sent"
        ),
    }
}
