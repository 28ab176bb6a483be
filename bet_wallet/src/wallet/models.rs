//! Wallet data models.

use super::bucket::Bucket;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client (tenant) ID type
pub type ClientId = i64;

/// User ID type
pub type UserId = i64;

/// Ledger status of a posted entry; no other value is ever written
pub const TRANSACTION_STATUS_POSTED: i16 = 1;

/// One wallet row: the six balance buckets of a user within a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub balance: Decimal,
    pub available_balance: Decimal,
    pub sport_bonus_balance: Decimal,
    pub virtual_bonus_balance: Decimal,
    pub casino_bonus_balance: Decimal,
    pub trust_balance: Decimal,
}

impl WalletBalances {
    /// A wallet with every bucket at zero
    pub fn empty(client_id: ClientId, user_id: UserId) -> Self {
        Self {
            client_id,
            user_id,
            balance: Decimal::ZERO,
            available_balance: Decimal::ZERO,
            sport_bonus_balance: Decimal::ZERO,
            virtual_bonus_balance: Decimal::ZERO,
            casino_bonus_balance: Decimal::ZERO,
            trust_balance: Decimal::ZERO,
        }
    }

    /// Builder-style setter for one bucket
    pub fn with(mut self, bucket: Bucket, value: Decimal) -> Self {
        *self.get_mut(bucket) = value;
        self
    }

    /// Current value of a bucket
    pub fn get(&self, bucket: Bucket) -> Decimal {
        match bucket {
            Bucket::Balance => self.balance,
            Bucket::Available => self.available_balance,
            Bucket::SportBonus => self.sport_bonus_balance,
            Bucket::VirtualBonus => self.virtual_bonus_balance,
            Bucket::CasinoBonus => self.casino_bonus_balance,
            Bucket::Trust => self.trust_balance,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut Decimal {
        match bucket {
            Bucket::Balance => &mut self.balance,
            Bucket::Available => &mut self.available_balance,
            Bucket::SportBonus => &mut self.sport_bonus_balance,
            Bucket::VirtualBonus => &mut self.virtual_bonus_balance,
            Bucket::CasinoBonus => &mut self.casino_bonus_balance,
            Bucket::Trust => &mut self.trust_balance,
        }
    }

    /// Point-in-time copy returned to callers
    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            user_id: self.user_id,
            balance: self.balance,
            available_balance: self.available_balance,
            sport_bonus_balance: self.sport_bonus_balance,
            virtual_bonus_balance: self.virtual_bonus_balance,
            casino_bonus_balance: self.casino_bonus_balance,
            trust_balance: self.trust_balance,
        }
    }
}

/// Wallet snapshot sent back to callers. Amounts serialize as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub user_id: UserId,
    pub balance: Decimal,
    pub available_balance: Decimal,
    pub sport_bonus_balance: Decimal,
    pub virtual_bonus_balance: Decimal,
    pub casino_bonus_balance: Decimal,
    pub trust_balance: Decimal,
}

/// Entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Credit,
    Debit,
}

impl EntryDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryDirection::Credit => "credit",
            EntryDirection::Debit => "debit",
        }
    }

    /// Parse the stored column value
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "credit" => Some(EntryDirection::Credit),
            "debit" => Some(EntryDirection::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger entry, one per accepted mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntry {
    pub id: i64,
    pub client_id: ClientId,
    pub user_id: UserId,
    pub username: String,
    pub transaction_no: String,
    pub amount: Decimal,
    pub tranx_type: EntryDirection,
    pub wallet: Bucket,
    pub subject: String,
    pub description: String,
    pub source: String,
    pub channel: String,
    /// Bucket value right after this mutation
    pub balance: Decimal,
    pub status: i16,
    pub created_at: DateTime<Utc>,
}

/// Credit or debit request as received from callers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletRequest {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub username: String,
    /// Decimal string, e.g. `"25.50"`
    pub amount: String,
    /// `sport-bonus`, `virtual`, `casino`, `trust`; anything else means the main bucket
    pub wallet_tag: String,
    pub subject: String,
    pub description: String,
    pub source: String,
    pub channel: String,
}

/// Uniform result of every wallet operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub ok: bool,
    pub status_code: u16,
    pub message: String,
    pub wallet_snapshot: Option<WalletSnapshot>,
}

impl WalletResponse {
    pub fn success(message: impl Into<String>, snapshot: WalletSnapshot) -> Self {
        Self {
            ok: true,
            status_code: 200,
            message: message.into(),
            wallet_snapshot: Some(snapshot),
        }
    }

    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status_code,
            message: message.into(),
            wallet_snapshot: None,
        }
    }
}

/// Result of a transaction history query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistoryResponse {
    pub ok: bool,
    pub status_code: u16,
    pub message: String,
    pub transactions: Vec<TransactionEntry>,
}

impl TransactionHistoryResponse {
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status_code,
            message: message.into(),
            transactions: Vec::new(),
        }
    }
}
