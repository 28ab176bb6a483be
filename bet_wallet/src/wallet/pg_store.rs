//! PostgreSQL wallet store.

use super::ledger::{self, TRANSACTION_COLUMNS, TransactionDraft};
use super::models::{ClientId, EntryDirection, TransactionEntry, UserId, WalletBalances};
use super::store::{BalanceDelta, DeltaOutcome, WalletStore};
use crate::db::timeouts::{DEFAULT_TRANSACTION_TIMEOUT, with_timeout};
use crate::db::{StoreError, StoreResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::time::Duration;

const BALANCE_COLUMNS: &str = "client_id, user_id, balance, available_balance, sport_bonus_balance, \
     virtual_bonus_balance, casino_bonus_balance, trust_balance";

/// Wallet store backed by the `wallets` and `transactions` tables
#[derive(Clone)]
pub struct PgWalletStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Override the per-call budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn select_balances(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> StoreResult<Option<WalletBalances>> {
        let row = sqlx::query(&format!(
            "SELECT {BALANCE_COLUMNS} FROM wallets WHERE client_id = $1 AND user_id = $2"
        ))
        .bind(client_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(balances_from_row).transpose()?)
    }

    async fn select_transactions(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: i64,
    ) -> StoreResult<Vec<TransactionEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS}
             FROM transactions
             WHERE client_id = $1 AND user_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        ))
        .bind(client_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(ledger::entry_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn apply_delta_tx(
        &self,
        delta: &BalanceDelta,
        draft: &TransactionDraft,
    ) -> StoreResult<DeltaOutcome> {
        let mut tx = self.pool.begin().await?;
        let column = delta.bucket.column();

        // The store computes the new value; debits carry their own floor so a
        // concurrent debit that passed the pre-check cannot go below zero.
        let sql = match delta.direction {
            EntryDirection::Credit => format!(
                "UPDATE wallets
                 SET {column} = {column} + $1, updated_at = NOW()
                 WHERE client_id = $2 AND user_id = $3
                 RETURNING {BALANCE_COLUMNS}"
            ),
            EntryDirection::Debit => format!(
                "UPDATE wallets
                 SET {column} = {column} - $1, updated_at = NOW()
                 WHERE client_id = $2 AND user_id = $3 AND {column} >= $1
                 RETURNING {BALANCE_COLUMNS}"
            ),
        };

        let updated = sqlx::query(&sql)
            .bind(delta.amount.value())
            .bind(delta.client_id)
            .bind(delta.user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let balances = match updated {
            Some(row) => balances_from_row(&row)?,
            None => {
                // Either the wallet doesn't exist or the floor rejected the debit
                let check = sqlx::query(&format!(
                    "SELECT {column} FROM wallets WHERE client_id = $1 AND user_id = $2"
                ))
                .bind(delta.client_id)
                .bind(delta.user_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Ok(match check {
                    Some(row) => DeltaOutcome::Insufficient {
                        available: row.try_get::<Decimal, _>(column)?,
                    },
                    None => DeltaOutcome::NotFound,
                });
            }
        };

        let entry = ledger::record(&mut *tx, draft, balances.get(delta.bucket))
            .await
            .map_err(StoreError::Ledger)?;

        tx.commit().await?;

        Ok(DeltaOutcome::Applied { balances, entry })
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn read_balances(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> StoreResult<Option<WalletBalances>> {
        with_timeout(self.timeout, self.select_balances(client_id, user_id)).await
    }

    async fn apply_delta(
        &self,
        delta: &BalanceDelta,
        draft: &TransactionDraft,
    ) -> StoreResult<DeltaOutcome> {
        with_timeout(self.timeout, self.apply_delta_tx(delta, draft)).await
    }

    async fn list_transactions(
        &self,
        client_id: ClientId,
        user_id: UserId,
        limit: i64,
    ) -> StoreResult<Vec<TransactionEntry>> {
        with_timeout(
            self.timeout,
            self.select_transactions(client_id, user_id, limit),
        )
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        with_timeout(self.timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }
}

fn balances_from_row(row: &PgRow) -> Result<WalletBalances, sqlx::Error> {
    Ok(WalletBalances {
        client_id: row.try_get("client_id")?,
        user_id: row.try_get("user_id")?,
        balance: row.try_get("balance")?,
        available_balance: row.try_get("available_balance")?,
        sport_bonus_balance: row.try_get("sport_bonus_balance")?,
        virtual_bonus_balance: row.try_get("virtual_bonus_balance")?,
        casino_bonus_balance: row.try_get("casino_bonus_balance")?,
        trust_balance: row.try_get("trust_balance")?,
    })
}
