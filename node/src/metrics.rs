//! # Prometheus Metrics
//!
//! Exposes operational metrics for the registry node. Scraped by Prometheus
//! at the `/metrics` HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so
//! they do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the node.
///
/// Clone-friendly (wraps `Arc` internally via prometheus handles) so it can
/// be shared across request handlers and background tasks.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total number of transcripts issued by this node.
    pub transcripts_issued_total: IntCounter,
    /// Total number of transcript amendments applied.
    pub transcript_updates_total: IntCounter,
    /// Total number of rejected operations (validation, authorization,
    /// configuration, capacity, and ledger failures combined).
    pub operations_rejected_total: IntCounter,
    /// Total fees collected across all successful issuances.
    pub fees_collected_total: IntCounter,
    /// Current transcript count (the identifier counter).
    pub transcript_count: IntGauge,
    /// Current ledger height used as the issuance timestamp source.
    pub ledger_height: IntGauge,
    /// Histogram of issuance handling latency in seconds.
    pub issuance_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("attesta".into()), None)
            .expect("failed to create prometheus registry");

        let transcripts_issued_total = IntCounter::new(
            "transcripts_issued_total",
            "Total number of transcripts issued",
        )
        .expect("metric creation");
        registry
            .register(Box::new(transcripts_issued_total.clone()))
            .expect("metric registration");

        let transcript_updates_total = IntCounter::new(
            "transcript_updates_total",
            "Total number of transcript amendments applied",
        )
        .expect("metric creation");
        registry
            .register(Box::new(transcript_updates_total.clone()))
            .expect("metric registration");

        let operations_rejected_total = IntCounter::new(
            "operations_rejected_total",
            "Total number of rejected registry operations",
        )
        .expect("metric creation");
        registry
            .register(Box::new(operations_rejected_total.clone()))
            .expect("metric registration");

        let fees_collected_total = IntCounter::new(
            "fees_collected_total",
            "Total issuance fees collected, in the ledger's smallest unit",
        )
        .expect("metric creation");
        registry
            .register(Box::new(fees_collected_total.clone()))
            .expect("metric registration");

        let transcript_count = IntGauge::new(
            "transcript_count",
            "Current value of the transcript identifier counter",
        )
        .expect("metric creation");
        registry
            .register(Box::new(transcript_count.clone()))
            .expect("metric registration");

        let ledger_height =
            IntGauge::new("ledger_height", "Current ledger height (timestamp source)")
                .expect("metric creation");
        registry
            .register(Box::new(ledger_height.clone()))
            .expect("metric registration");

        let issuance_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "issuance_latency_seconds",
                "End-to-end issuance handling latency in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(issuance_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            transcripts_issued_total,
            transcript_updates_total,
            operations_rejected_total,
            fees_collected_total,
            transcript_count,
            ledger_height,
            issuance_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers via extension.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
