// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Attesta Registry Node
//!
//! Entry point for the `attesta-node` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the transcript registry
//! over HTTP alongside a Prometheus metrics endpoint.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — start the registry node
//! - `status`  — query a running node's status endpoint
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;

use attesta_registry::access::IssuerSet;
use attesta_registry::config::RegistryConfig;
use attesta_registry::ledger::{LedgerTransfer, RecordingLedger};
use attesta_registry::{Address, TranscriptRegistry};

use cli::{AttestaNodeCli, Commands};
use logging::LogFormat;
use metrics::NodeMetrics;

/// Interval at which the ledger height advances. The height is the
/// registry's timestamp source, so every issuance within one tick shares
/// a timestamp.
const HEIGHT_TICK_MS: u64 = 10_000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = AttestaNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Status(args) => query_status(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full registry node: API server, metrics endpoint, and the
/// height ticker.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "attesta_node=info,attesta_registry=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        issuance_fee = args.issuance_fee,
        max_transcripts = args.max_transcripts,
        issuers = args.issuers.len(),
        "starting attesta-node"
    );

    // --- Registry engine ---
    let config = RegistryConfig {
        issuance_fee: args.issuance_fee,
        fee_recipient: None,
        max_transcripts: args.max_transcripts,
    };
    let issuers = IssuerSet::with_issuers(args.issuers.iter().map(|s| Address::from(s.as_str())));
    let ledger = Arc::new(RecordingLedger::new());
    let registry = TranscriptRegistry::new(
        config,
        issuers,
        Arc::clone(&ledger) as Arc<dyn LedgerTransfer>,
    );

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());

    // --- Ledger height ---
    let height = Arc::new(AtomicU64::new(0));

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        registry: Arc::new(RwLock::new(registry)),
        ledger,
        height: Arc::clone(&height),
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state.clone());
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind RPC listener on {}", api_addr))?;
    tracing::info!("RPC/API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Height ticker ---
    // Stands in for the external ledger's block clock: the height advances
    // on a fixed interval and feeds both issuance timestamps and the gauge.
    let height_ref = Arc::clone(&height);
    let metrics_ref = Arc::clone(&node_metrics);
    let height_loop = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_millis(HEIGHT_TICK_MS));
        loop {
            interval.tick().await;
            let h = height_ref.fetch_add(1, Ordering::Relaxed) + 1;
            metrics_ref.ledger_height.set(h as i64);
            tracing::debug!(height = h, "ledger height advanced");
        }
    });

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    height_loop.abort();
    tracing::info!("attesta-node stopped");
    Ok(())
}

/// Queries a running node's status endpoint and prints the result.
async fn query_status(args: cli::StatusArgs) -> Result<()> {
    let url = format!("{}/status", args.rpc_url.trim_end_matches('/'));
    let body = http_get(&url).await?;
    println!("{}", body);
    Ok(())
}

/// Minimal HTTP GET without pulling in an HTTP client dependency.
/// Raw HTTP/1.1 over a tokio TCP stream is sufficient for a local
/// status probe.
async fn http_get(url: &str) -> Result<String> {
    let (host, port, path) = parse_url(url)?;

    let addr = format!("{}:{}", host, port);
    let mut stream = tokio::net::TcpStream::connect(&addr)
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, host,
    );

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream.write_all(request.as_bytes()).await?;
    stream.shutdown().await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    let response = String::from_utf8_lossy(&buf);

    // Strip HTTP headers — everything after the first blank line is the body.
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_else(|| response.to_string());

    Ok(body)
}

/// Extracts host, port, and path from an `http://` URL. Just enough
/// parsing for the status probe; not a general URL parser.
fn parse_url(url: &str) -> Result<(String, u16, String)> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| anyhow::anyhow!("only http:// URLs are supported: {}", url))?;

    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], rest[i..].to_string()),
        None => (rest, "/".to_string()),
    };

    let (host, port) = match authority.rfind(':') {
        Some(i) => {
            let p = authority[i + 1..]
                .parse::<u16>()
                .with_context(|| format!("bad port in URL: {}", url))?;
            (authority[..i].to_string(), p)
        }
        None => (authority.to_string(), 80),
    };

    Ok((host, port, path))
}

/// Prints version information to stdout.
fn print_version() {
    println!("attesta-node {}", env!("CARGO_PKG_VERSION"));
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
