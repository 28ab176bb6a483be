//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; the subscriber installed here
//! picks those records up alongside native `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use bw_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the outcome of one wallet operation
///
/// # Arguments
///
/// * `operation` - Operation name (`credit_user`, `debit_user`, ...)
/// * `request_id` - Correlation ID of the HTTP request
/// * `client_id` - Client (tenant) ID
/// * `user_id` - User ID
/// * `status_code` - Wallet status code returned to the caller
/// * `duration_ms` - Time spent in the wallet service
pub fn log_wallet_operation(
    operation: &str,
    request_id: &str,
    client_id: i64,
    user_id: i64,
    status_code: u16,
    duration_ms: u64,
) {
    if status_code >= 500 {
        tracing::error!(
            operation = operation,
            request_id = request_id,
            client_id = client_id,
            user_id = user_id,
            status_code = status_code,
            duration_ms = duration_ms,
            "Wallet operation failed"
        );
    } else {
        tracing::info!(
            operation = operation,
            request_id = request_id,
            client_id = client_id,
            user_id = user_id,
            status_code = status_code,
            duration_ms = duration_ms,
            "Wallet operation completed"
        );
    }

    if duration_ms > 1000 {
        tracing::warn!(
            operation = operation,
            request_id = request_id,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow wallet operation"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_wallet_operation() {
        // Just ensure it doesn't panic without a subscriber
        log_wallet_operation("credit_user", "req-1", 1, 2, 200, 12);
        log_wallet_operation("debit_user", "req-2", 1, 2, 500, 2500);
    }
}
