//! Wallet error types.

use super::models::{ClientId, UserId};
use crate::amount::AmountError;
use crate::db::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Amount failed to parse or validate
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// No wallet row for the user within the client
    #[error("Wallet not found for user {user_id} (client {client_id})")]
    WalletNotFound { client_id: ClientId, user_id: UserId },

    /// Insufficient balance in the selected bucket
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },

    /// Reading or mutating balances failed
    #[error("Store error: {0}")]
    Store(StoreError),

    /// The ledger entry could not be written
    #[error("Error saving transaction: {0}")]
    LedgerWrite(StoreError),
}

impl From<StoreError> for WalletError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Ledger(_) => WalletError::LedgerWrite(err),
            other => WalletError::Store(other),
        }
    }
}

impl WalletError {
    /// Status code returned to callers
    pub fn status_code(&self) -> u16 {
        match self {
            WalletError::InvalidAmount(_) | WalletError::InsufficientBalance { .. } => 400,
            WalletError::WalletNotFound { .. } => 404,
            WalletError::Store(_) | WalletError::LedgerWrite(_) => 500,
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store errors are reduced to a fixed message and IDs are never echoed.
    pub fn client_message(&self) -> String {
        match self {
            WalletError::InvalidAmount(_) => "Invalid amount".to_string(),
            WalletError::WalletNotFound { .. } => "User not found".to_string(),
            WalletError::InsufficientBalance { .. } => "Insufficient balance".to_string(),
            WalletError::Store(_) => "Internal server error".to_string(),
            WalletError::LedgerWrite(_) => "Error saving transaction".to_string(),
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        let invalid = WalletError::from(AmountError::Negative("-1".to_string()));
        assert_eq!(invalid.status_code(), 400);

        let missing = WalletError::WalletNotFound {
            client_id: 1,
            user_id: 2,
        };
        assert_eq!(missing.status_code(), 404);
        assert_eq!(missing.client_message(), "User not found");

        let short = WalletError::InsufficientBalance {
            available: Decimal::ZERO,
            required: Decimal::ONE,
        };
        assert_eq!(short.status_code(), 400);
        assert_eq!(short.client_message(), "Insufficient balance");
    }

    #[test]
    fn test_ledger_failures_are_distinguished() {
        let err = WalletError::from(StoreError::Ledger(sqlx::Error::RowNotFound));
        assert!(matches!(err, WalletError::LedgerWrite(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "Error saving transaction");
    }

    #[test]
    fn test_store_details_are_sanitized() {
        let err = WalletError::from(StoreError::Timeout(Duration::from_secs(5)));
        assert!(matches!(err, WalletError::Store(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.to_string().contains("timed out"));
    }
}
