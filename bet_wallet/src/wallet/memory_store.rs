//! In-process wallet store.
//!
//! Holds wallets and ledger entries behind one mutex; a delta, its re-read and
//! its ledger entry happen under the same lock, mirroring the single database
//! transaction of [`PgWalletStore`](super::PgWalletStore).

use super::ledger::TransactionDraft;
use super::models::{ClientId, TransactionEntry, UserId, WalletBalances};
use super::store::{BalanceDelta, DeltaOutcome, WalletStore};
use crate::amount::MAX_AMOUNT;
use crate::db::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    wallets: HashMap<(ClientId, UserId), WalletBalances>,
    transactions: Vec<TransactionEntry>,
    next_id: i64,
    fail_ledger_writes: bool,
}

/// Wallet store kept in memory
#[derive(Clone, Default)]
pub struct MemoryWalletStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a wallet, builder style
    pub fn with_wallet(self, balances: WalletBalances) -> Self {
        self.insert_wallet(balances);
        self
    }

    /// Provision or replace a wallet
    pub fn insert_wallet(&self, balances: WalletBalances) {
        self.lock()
            .wallets
            .insert((balances.client_id, balances.user_id), balances);
    }

    /// Make every following ledger insert fail, rolling back its delta
    pub fn fail_ledger_writes(&self, fail: bool) {
        self.lock().fail_ledger_writes = fail;
    }

    /// Number of ledger entries recorded so far
    pub fn transaction_count(&self) -> usize {
        self.lock().transactions.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn read_balances(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> StoreResult<Option<WalletBalances>> {
        Ok(self.lock().wallets.get(&(client_id, user_id)).cloned())
    }

    async fn apply_delta(
        &self,
        delta: &BalanceDelta,
        draft: &TransactionDraft,
    ) -> StoreResult<DeltaOutcome> {
        let mut state = self.lock();
        let fail_ledger_writes = state.fail_ledger_writes;

        let Some(wallet) = state.wallets.get_mut(&(delta.client_id, delta.user_id)) else {
            return Ok(DeltaOutcome::NotFound);
        };

        let current = wallet.get(delta.bucket);
        let updated = current
            .checked_add(delta.signed_amount())
            .filter(|value| *value < MAX_AMOUNT)
            .ok_or(StoreError::Overflow)?;
        if updated < Decimal::ZERO {
            return Ok(DeltaOutcome::Insufficient { available: current });
        }

        // Checked before the write so a failed insert leaves the bucket untouched
        if fail_ledger_writes {
            return Err(StoreError::Ledger(sqlx::Error::Protocol(
                "ledger writes disabled".to_string(),
            )));
        }

        *wallet.get_mut(delta.bucket) = updated;
        let balances = wallet.clone();

        state.next_id += 1;
        let entry = draft
            .clone()
            .into_entry(state.next_id, updated, Utc::now());
        state.transactions.push(entry.clone());

        Ok(DeltaOutcome::Applied { balances, entry })
    }

    async fn list_transactions(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: i64,
    ) -> StoreResult<Vec<TransactionEntry>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .lock()
            .transactions
            .iter()
            .rev()
            .filter(|entry| entry.client_id == client_id && entry.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::wallet::{Bucket, EntryDirection, WalletRequest};

    fn delta(direction: EntryDirection, amount: &str) -> (BalanceDelta, TransactionDraft) {
        let amount: Amount = amount.parse().unwrap();
        let request = WalletRequest {
            client_id: 1,
            user_id: 1,
            amount: amount.to_string(),
            ..Default::default()
        };
        let delta = BalanceDelta {
            client_id: 1,
            user_id: 1,
            bucket: Bucket::Available,
            direction,
            amount,
        };
        let draft = TransactionDraft::new(&request, amount, direction, Bucket::Available);
        (delta, draft)
    }

    fn store_with(available: i64) -> MemoryWalletStore {
        MemoryWalletStore::new().with_wallet(
            WalletBalances::empty(1, 1).with(Bucket::Available, Decimal::from(available)),
        )
    }

    #[tokio::test]
    async fn test_floor_rejects_overdraw() {
        let store = store_with(10);
        let (delta, draft) = delta(EntryDirection::Debit, "10.01");

        let outcome = store.apply_delta(&delta, &draft).await.unwrap();
        assert_eq!(
            outcome,
            DeltaOutcome::Insufficient {
                available: Decimal::from(10)
            }
        );
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_credit_past_column_range_overflows() {
        let near_limit = Decimal::from(9_999_999_999_999_999_i64);
        let store = MemoryWalletStore::new()
            .with_wallet(WalletBalances::empty(1, 1).with(Bucket::Available, near_limit));
        let (delta, draft) = delta(EntryDirection::Credit, "1");

        let err = store.apply_delta(&delta, &draft).await.unwrap_err();
        assert!(matches!(err, StoreError::Overflow));

        let balances = store.read_balances(1, 1).await.unwrap().unwrap();
        assert_eq!(balances.available_balance, near_limit);
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_wallet() {
        let store = MemoryWalletStore::new();
        let (delta, draft) = delta(EntryDirection::Credit, "1");
        let outcome = store.apply_delta(&delta, &draft).await.unwrap();
        assert_eq!(outcome, DeltaOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_failed_ledger_write_rolls_back() {
        let store = store_with(10);
        store.fail_ledger_writes(true);
        let (delta, draft) = delta(EntryDirection::Credit, "5");

        let err = store.apply_delta(&delta, &draft).await.unwrap_err();
        assert!(matches!(err, StoreError::Ledger(_)));

        let balances = store.read_balances(1, 1).await.unwrap().unwrap();
        assert_eq!(balances.available_balance, Decimal::from(10));
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let store = store_with(0);
        for amount in ["1", "2", "3"] {
            let (delta, draft) = delta(EntryDirection::Credit, amount);
            store.apply_delta(&delta, &draft).await.unwrap();
        }

        let entries = store.list_transactions(1, 1, 2).await.unwrap();
        let amounts: Vec<Decimal> = entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Decimal::from(3), Decimal::from(2)]);
        assert_eq!(entries[0].balance, Decimal::from(6));
    }
}
