//! Transaction recorder.
//!
//! Every accepted mutation appends one immutable row to `transactions`. The
//! insert runs on the same store transaction as the balance delta, so a failed
//! insert takes the delta down with it.

use super::bucket::Bucket;
use super::models::{
    ClientId, EntryDirection, TRANSACTION_STATUS_POSTED, TransactionEntry, UserId, WalletRequest,
};
use crate::amount::Amount;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Row, postgres::PgRow};

/// Length of a generated reference code
pub const REFERENCE_CODE_LEN: usize = 7;

const REFERENCE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Columns selected for a ledger entry
pub(crate) const TRANSACTION_COLUMNS: &str = "id, client_id, user_id, username, transaction_no, amount, tranx_type, wallet, \
     subject, description, source, channel, balance, status, created_at";

/// Generate a human-readable reference code such as `K7Q2ZT9`.
///
/// Codes are informational labels; collisions are possible and not checked.
pub fn generate_reference_code() -> String {
    let mut rng = rand::rng();
    (0..REFERENCE_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..REFERENCE_CODE_CHARSET.len());
            REFERENCE_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// A ledger entry waiting for its post-mutation balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub username: String,
    pub transaction_no: String,
    pub amount: Decimal,
    pub direction: EntryDirection,
    pub bucket: Bucket,
    pub subject: String,
    pub description: String,
    pub source: String,
    pub channel: String,
}

impl TransactionDraft {
    /// Draft an entry for `request`, with a fresh reference code
    pub fn new(
        request: &WalletRequest,
        amount: Amount,
        direction: EntryDirection,
        bucket: Bucket,
    ) -> Self {
        Self {
            client_id: request.client_id,
            user_id: request.user_id,
            username: request.username.clone(),
            transaction_no: generate_reference_code(),
            amount: amount.value(),
            direction,
            bucket,
            subject: request.subject.clone(),
            description: request.description.clone(),
            source: request.source.clone(),
            channel: request.channel.clone(),
        }
    }

    /// Complete the draft once the store has assigned an ID
    pub fn into_entry(
        self,
        id: i64,
        balance_after: Decimal,
        created_at: DateTime<Utc>,
    ) -> TransactionEntry {
        TransactionEntry {
            id,
            client_id: self.client_id,
            user_id: self.user_id,
            username: self.username,
            transaction_no: self.transaction_no,
            amount: self.amount,
            tranx_type: self.direction,
            wallet: self.bucket,
            subject: self.subject,
            description: self.description,
            source: self.source,
            channel: self.channel,
            balance: balance_after,
            status: TRANSACTION_STATUS_POSTED,
            created_at,
        }
    }
}

/// Insert the entry for `draft` on the caller's connection or transaction
pub async fn record(
    conn: &mut PgConnection,
    draft: &TransactionDraft,
    balance_after: Decimal,
) -> Result<TransactionEntry, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO transactions
            (client_id, user_id, username, transaction_no, amount, tranx_type, wallet,
             subject, description, source, channel, balance, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id, created_at
        "#,
    )
    .bind(draft.client_id)
    .bind(draft.user_id)
    .bind(&draft.username)
    .bind(&draft.transaction_no)
    .bind(draft.amount)
    .bind(draft.direction.as_str())
    .bind(draft.bucket.column())
    .bind(&draft.subject)
    .bind(&draft.description)
    .bind(&draft.source)
    .bind(&draft.channel)
    .bind(balance_after)
    .bind(TRANSACTION_STATUS_POSTED)
    .fetch_one(&mut *conn)
    .await?;

    let id: i64 = row.try_get("id")?;
    let created_at = row.try_get::<chrono::NaiveDateTime, _>("created_at")?.and_utc();

    Ok(draft.clone().into_entry(id, balance_after, created_at))
}

/// Map a `transactions` row selected with [`TRANSACTION_COLUMNS`]
pub(crate) fn entry_from_row(row: &PgRow) -> Result<TransactionEntry, sqlx::Error> {
    let tranx_type: String = row.try_get("tranx_type")?;
    let wallet: String = row.try_get("wallet")?;

    Ok(TransactionEntry {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        transaction_no: row.try_get("transaction_no")?,
        amount: row.try_get("amount")?,
        tranx_type: EntryDirection::from_db(&tranx_type).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown tranx_type {tranx_type:?}").into())
        })?,
        wallet: Bucket::from_column(&wallet)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown wallet {wallet:?}").into()))?,
        subject: row.try_get("subject")?,
        description: row.try_get("description")?,
        source: row.try_get("source")?,
        channel: row.try_get("channel")?,
        balance: row.try_get("balance")?,
        status: row.try_get("status")?,
        created_at: row
            .try_get::<chrono::NaiveDateTime, _>("created_at")?
            .and_utc(),
    })
}
