//! Database query timeout helpers
//!
//! Store calls never retry; a call that outlives its budget fails the request.

use super::errors::{StoreError, StoreResult};
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for a balance mutation transaction (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Execute a store operation with timeout
///
/// # Arguments
///
/// * `duration` - Timeout duration
/// * `future` - Async operation to execute
///
/// # Returns
///
/// * `StoreResult<T>` - Result of the operation or `StoreError::Timeout`
///
/// # Example
///
/// ```no_run
/// use bet_wallet::db::StoreError;
/// use bet_wallet::db::timeouts::{with_timeout, DEFAULT_TRANSACTION_TIMEOUT};
/// # use sqlx::PgPool;
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
///
/// let row = with_timeout(DEFAULT_TRANSACTION_TIMEOUT, async {
///     Ok::<_, StoreError>(sqlx::query("SELECT 1").fetch_one(pool).await?)
/// })
/// .await?;
///
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> StoreResult<T>
where
    F: std::future::Future<Output = StoreResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(duration)),
    }
}
