//! Wallet module: multi-bucket balances with an append-only transaction ledger.
//!
//! This module implements:
//! - Wallet-tag to bucket resolution with a permissive default
//! - Sufficiency checks for debits, backed by a floor inside the store update
//! - Store-side atomic deltas (`new = old ± amount`), no read-modify-write
//! - One immutable ledger entry per accepted mutation, committed with it
//!
//! ## Example
//!
//! ```no_run
//! use bet_wallet::db::{Database, DatabaseConfig};
//! use bet_wallet::wallet::{WalletRequest, WalletService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let wallet = WalletService::new(Arc::new(db.wallet_store()));
//!
//!     let response = wallet
//!         .debit_user(&WalletRequest {
//!             client_id: 1,
//!             user_id: 42,
//!             username: "punter".to_string(),
//!             amount: "30".to_string(),
//!             wallet_tag: "casino".to_string(),
//!             ..Default::default()
//!         })
//!         .await;
//!     println!("{} {}", response.status_code, response.message);
//!
//!     Ok(())
//! }
//! ```

pub mod bucket;
pub mod errors;
pub mod ledger;
pub mod memory_store;
pub mod models;
pub mod pg_store;
pub mod service;
pub mod store;

pub use bucket::{Bucket, ensure_sufficient};
pub use errors::{WalletError, WalletResult};
pub use ledger::{TransactionDraft, generate_reference_code};
pub use memory_store::MemoryWalletStore;
pub use models::{
    ClientId, EntryDirection, TRANSACTION_STATUS_POSTED, TransactionEntry,
    TransactionHistoryResponse, UserId, WalletBalances, WalletRequest, WalletResponse,
    WalletSnapshot,
};
pub use pg_store::PgWalletStore;
pub use service::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, WalletService};
pub use store::{BalanceDelta, DeltaOutcome, WalletStore};
