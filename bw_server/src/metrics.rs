//! Prometheus metrics for wallet operations.
//!
//! The exporter is optional: without [`init_metrics`] the recorders below are
//! no-ops.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bw_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::wallet_operations_total("credit_user", 200);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Count a wallet operation by its wallet status code.
pub fn wallet_operations_total(operation: &'static str, status: u16) {
    metrics::counter!("wallet_operations_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record wallet operation duration in seconds.
pub fn wallet_operation_duration_seconds(operation: &'static str, seconds: f64) {
    metrics::histogram!("wallet_operation_duration_seconds",
        "operation" => operation
    )
    .record(seconds);
}

/// Set database health (1 healthy, 0 unhealthy).
pub fn store_healthy(healthy: bool) {
    metrics::gauge!("wallet_store_healthy").set(if healthy { 1.0 } else { 0.0 });
}
