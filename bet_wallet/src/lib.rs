//! # Bet Wallet
//!
//! Wallet balance mutation service for a betting platform.
//!
//! Each user owns one wallet per client (tenant). A wallet is split into six
//! balance buckets: the primary balance, the available balance, three bonus
//! balances (sport, virtual, casino) and a trust balance. Callers credit or
//! debit exactly one bucket per request, and every accepted mutation is paired
//! with an immutable transaction entry.
//!
//! ## Architecture
//!
//! - **Bucket resolution**: a wallet-type tag selects the bucket to touch
//! - **Sufficiency guard**: debits are rejected before any write when the
//!   bucket cannot cover them
//! - **Store accessor**: the store applies `new = old ± amount` itself, never a
//!   read-modify-write from the application
//! - **Transaction recorder**: the ledger entry commits together with the delta
//! - **Orchestrator**: [`WalletService`] folds every outcome into a uniform
//!   [`WalletResponse`]
//!
//! ## Core Modules
//!
//! - [`amount`]: fixed-point monetary amounts parsed from decimal strings
//! - [`db`]: PostgreSQL pool, configuration and query timeouts
//! - [`wallet`]: buckets, ledger, stores and the service itself
//!
//! ## Example
//!
//! ```
//! use bet_wallet::wallet::{Bucket, MemoryWalletStore, WalletBalances, WalletService};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = MemoryWalletStore::new()
//!     .with_wallet(WalletBalances::empty(1, 42).with(Bucket::Available, Decimal::from(100)));
//! let service = WalletService::new(Arc::new(store));
//!
//! let response = service.get_balance(1, 42).await;
//! assert!(response.ok);
//! # }
//! ```

/// Fixed-point monetary amounts.
pub mod amount;

/// Database connection pooling, configuration and timeouts.
pub mod db;

/// Wallet balances, ledger and operations.
pub mod wallet;

pub use amount::{Amount, AmountError};
pub use wallet::{
    WalletError, WalletRequest, WalletResponse, WalletResult, WalletService, WalletSnapshot,
};
