//! Balance store accessor.
//!
//! The trait keeps the orchestrator independent of PostgreSQL so the same
//! wallet logic runs against the in-memory store in tests.

use super::bucket::Bucket;
use super::ledger::TransactionDraft;
use super::models::{ClientId, EntryDirection, TransactionEntry, UserId, WalletBalances};
use crate::amount::Amount;
use crate::db::StoreResult;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// A single-bucket change, applied by the store as `new = old ± amount`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub bucket: Bucket,
    pub direction: EntryDirection,
    pub amount: Amount,
}

impl BalanceDelta {
    /// Amount with the sign of the direction
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            EntryDirection::Credit => self.amount.value(),
            EntryDirection::Debit => -self.amount.value(),
        }
    }
}

/// What happened to a delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// Delta applied and ledger entry written in one unit
    Applied {
        balances: WalletBalances,
        entry: TransactionEntry,
    },
    /// No wallet row matched the user and client
    NotFound,
    /// A debit would have taken the bucket below zero; nothing changed
    Insufficient { available: Decimal },
}

/// Trait for wallet store operations
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Point read of all six buckets
    async fn read_balances(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> StoreResult<Option<WalletBalances>>;

    /// Atomically apply `delta`, re-read the wallet and record `draft`.
    ///
    /// Debits only apply while the bucket stays at or above zero. The three
    /// steps commit or roll back together.
    async fn apply_delta(
        &self,
        delta: &BalanceDelta,
        draft: &TransactionDraft,
    ) -> StoreResult<DeltaOutcome>;

    /// Most recent ledger entries for a wallet, newest first
    async fn list_transactions(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: i64,
    ) -> StoreResult<Vec<TransactionEntry>>;

    /// Liveness probe
    async fn ping(&self) -> StoreResult<()>;
}
