//! Store error types.

use std::time::Duration;
use thiserror::Error;

/// Failures reported by a wallet store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or updating balances failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The ledger insert failed; the surrounding mutation was rolled back
    #[error("Ledger write failed: {0}")]
    Ledger(sqlx::Error),

    /// The store did not answer in time
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// A bucket would exceed the numeric range of the store
    #[error("Balance overflow")]
    Overflow,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
