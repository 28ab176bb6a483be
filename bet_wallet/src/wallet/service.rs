//! Wallet operation orchestrator.

use super::bucket::{Bucket, ensure_sufficient};
use super::errors::{WalletError, WalletResult};
use super::ledger::TransactionDraft;
use super::models::{
    ClientId, EntryDirection, TransactionEntry, TransactionHistoryResponse, UserId,
    WalletBalances, WalletRequest, WalletResponse, WalletSnapshot,
};
use super::store::{BalanceDelta, DeltaOutcome, WalletStore};
use crate::amount::Amount;
use std::sync::Arc;

/// Default number of ledger entries returned by [`WalletService::list_transactions`]
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Upper bound for a history page
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Wallet service
///
/// Runs credit, debit and balance reads against a [`WalletStore`]. Holds no
/// mutable state of its own; concurrent calls only meet inside the store.
#[derive(Clone)]
pub struct WalletService {
    store: Arc<dyn WalletStore>,
}

impl WalletService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Add funds to the bucket selected by `request.wallet_tag`
    ///
    /// # Returns
    ///
    /// * `200` with the updated snapshot
    /// * `400` if the amount is invalid
    /// * `404` if the wallet does not exist
    /// * `500` on store or ledger failure
    pub async fn credit_user(&self, request: &WalletRequest) -> WalletResponse {
        let result = self.mutate(request, EntryDirection::Credit).await;
        respond("credit_user", result, "Wallet credited successfully")
    }

    /// Remove funds from the bucket selected by `request.wallet_tag`
    ///
    /// Same outcomes as [`credit_user`](Self::credit_user), plus `400`
    /// "Insufficient balance" when the bucket cannot cover the amount. In that
    /// case nothing is written.
    pub async fn debit_user(&self, request: &WalletRequest) -> WalletResponse {
        let result = self.mutate(request, EntryDirection::Debit).await;
        respond("debit_user", result, "Wallet debited successfully")
    }

    /// Read all six buckets without touching them
    pub async fn get_balance(&self, client_id: ClientId, user_id: UserId) -> WalletResponse {
        let result = self
            .load_wallet(client_id, user_id)
            .await
            .map(|balances| balances.snapshot());
        respond("get_balance", result, "Balance retrieved successfully")
    }

    /// Newest ledger entries of a wallet; `limit` is clamped to `1..=100`
    pub async fn list_transactions(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: Option<i64>,
    ) -> TransactionHistoryResponse {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        match self.history(client_id, user_id, limit).await {
            Ok(transactions) => TransactionHistoryResponse {
                ok: true,
                status_code: 200,
                message: "Transactions retrieved successfully".to_string(),
                transactions,
            },
            Err(err) => {
                log_failure("list_transactions", &err);
                TransactionHistoryResponse::failure(err.status_code(), err.client_message())
            }
        }
    }

    /// Whether the backing store answers
    pub async fn is_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    async fn mutate(
        &self,
        request: &WalletRequest,
        direction: EntryDirection,
    ) -> WalletResult<WalletSnapshot> {
        let amount: Amount = request.amount.parse()?;
        let current = self.load_wallet(request.client_id, request.user_id).await?;
        let bucket = Bucket::from_wallet_tag(&request.wallet_tag);

        if direction == EntryDirection::Debit {
            ensure_sufficient(bucket, &current, amount)?;
        }

        let delta = BalanceDelta {
            client_id: request.client_id,
            user_id: request.user_id,
            bucket,
            direction,
            amount,
        };
        let draft = TransactionDraft::new(request, amount, direction, bucket);

        match self.store.apply_delta(&delta, &draft).await? {
            DeltaOutcome::Applied { balances, entry } => {
                log::info!(
                    "{} {} on {} for user {} (client {}): {} -> {} [{}]",
                    direction,
                    amount,
                    bucket,
                    request.user_id,
                    request.client_id,
                    current.get(bucket),
                    entry.balance,
                    entry.transaction_no,
                );
                Ok(balances.snapshot())
            }
            DeltaOutcome::NotFound => Err(WalletError::WalletNotFound {
                client_id: request.client_id,
                user_id: request.user_id,
            }),
            DeltaOutcome::Insufficient { available } => Err(WalletError::InsufficientBalance {
                available,
                required: amount.value(),
            }),
        }
    }

    async fn load_wallet(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> WalletResult<WalletBalances> {
        self.store
            .read_balances(client_id, user_id)
            .await?
            .ok_or(WalletError::WalletNotFound { client_id, user_id })
    }

    async fn history(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: i64,
    ) -> WalletResult<Vec<TransactionEntry>> {
        self.load_wallet(client_id, user_id).await?;
        Ok(self
            .store
            .list_transactions(client_id, user_id, limit)
            .await?)
    }
}

/// Fold an operation result into the uniform response
fn respond(
    operation: &str,
    result: WalletResult<WalletSnapshot>,
    success_message: &str,
) -> WalletResponse {
    match result {
        Ok(snapshot) => WalletResponse::success(success_message, snapshot),
        Err(err) => {
            log_failure(operation, &err);
            WalletResponse::failure(err.status_code(), err.client_message())
        }
    }
}

fn log_failure(context: &str, err: &WalletError) {
    match err {
        WalletError::Store(_) | WalletError::LedgerWrite(_) => {
            log::error!("{context}: {err}");
        }
        _ => log::warn!("{context}: {err}"),
    }
}
