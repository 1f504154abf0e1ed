//! Prometheus metrics for observability and monitoring.
//!
//! The store records reducer timings and effect counts, and the API client
//! records request counts and latencies. [`MetricsServer`] installs a
//! Prometheus recorder and serves everything on `/metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use eventease_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Metrics available at http://localhost:9090/metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
}

/// Prometheus metrics server.
///
/// Exposes metrics on an HTTP endpoint for Prometheus scraping.
pub struct MetricsServer {
    addr: SocketAddr,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// * `addr` - Socket address to bind to (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Install the recorder and spawn the HTTP exporter.
    ///
    /// Must be called from within a tokio runtime. Returns `false` when a
    /// recorder was already installed, in which case nothing is exported.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built.
    pub fn start(&self) -> Result<bool, MetricsError> {
        register_metrics();

        let (recorder, exporter) = PrometheusBuilder::new()
            .with_http_listener(self.addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
            return Ok(false);
        }

        tokio::spawn(async move {
            if let Err(_error) = exporter.await {
                tracing::error!("Metrics exporter stopped");
            }
        });
        tracing::info!(addr = %self.addr, "Metrics available at http://{}/metrics", self.addr);
        Ok(true)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store.commands.total", "Total number of actions sent to the store");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to reduce one action"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by effect type"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );

    // API client
    describe_counter!("api.requests.total", "Total number of API requests, labelled by route");
    describe_counter!(
        "api.requests.failed",
        "Total number of failed API requests, labelled by route"
    );
    describe_histogram!(
        "api.request.duration_seconds",
        "Time taken for an API round trip"
    );

    // Slices
    describe_counter!(
        "state.responses.stale",
        "Responses discarded because a newer request was issued, labelled by slice"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action reduced by the store.
    pub fn record_action(duration: Duration) {
        counter!("store.commands.total").increment(1);
        histogram!("store.reducer.duration_seconds").record(duration.as_secs_f64());
    }
}
