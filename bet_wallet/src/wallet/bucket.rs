//! Balance buckets, wallet-tag resolution and the debit sufficiency guard.

use super::errors::{WalletError, WalletResult};
use super::models::WalletBalances;
use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// One of the six balance columns of a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "balance")]
    Balance,
    #[serde(rename = "available_balance")]
    Available,
    #[serde(rename = "sport_bonus_balance")]
    SportBonus,
    #[serde(rename = "virtual_bonus_balance")]
    VirtualBonus,
    #[serde(rename = "casino_bonus_balance")]
    CasinoBonus,
    #[serde(rename = "trust_balance")]
    Trust,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::Balance,
        Bucket::Available,
        Bucket::SportBonus,
        Bucket::VirtualBonus,
        Bucket::CasinoBonus,
        Bucket::Trust,
    ];

    /// Bucket used when the wallet tag is empty or unrecognized
    pub const DEFAULT: Bucket = Bucket::Available;

    /// Column name in the `wallets` table.
    ///
    /// Only these static names are ever interpolated into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Bucket::Balance => "balance",
            Bucket::Available => "available_balance",
            Bucket::SportBonus => "sport_bonus_balance",
            Bucket::VirtualBonus => "virtual_bonus_balance",
            Bucket::CasinoBonus => "casino_bonus_balance",
            Bucket::Trust => "trust_balance",
        }
    }

    /// Parse a stored column name
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.column() == column)
    }

    /// Resolve a caller-supplied wallet tag.
    ///
    /// Unknown tags, typos included, are routed to [`Bucket::DEFAULT`] instead
    /// of being rejected. Matching is exact.
    ///
    /// # Examples
    ///
    /// ```
    /// use bet_wallet::wallet::Bucket;
    ///
    /// assert_eq!(Bucket::from_wallet_tag("casino"), Bucket::CasinoBonus);
    /// assert_eq!(Bucket::from_wallet_tag(""), Bucket::Available);
    /// assert_eq!(Bucket::from_wallet_tag("casnio"), Bucket::Available);
    /// ```
    pub fn from_wallet_tag(tag: &str) -> Self {
        match tag {
            "sport-bonus" => Bucket::SportBonus,
            "virtual" => Bucket::VirtualBonus,
            "casino" => Bucket::CasinoBonus,
            "trust" => Bucket::Trust,
            "" => Self::DEFAULT,
            unknown => {
                log::debug!("Unknown wallet tag {unknown:?}, using {}", Self::DEFAULT);
                Self::DEFAULT
            }
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Reject a debit the bucket cannot cover.
///
/// `balances` is a snapshot taken before the mutation and is not part of the
/// atomic update, so the store enforces the same floor again when it applies
/// the delta.
pub fn ensure_sufficient(
    bucket: Bucket,
    balances: &WalletBalances,
    amount: Amount,
) -> WalletResult<()> {
    let available = balances.get(bucket);
    if available < amount.value() {
        return Err(WalletError::InsufficientBalance {
            available,
            required: amount.value(),
        });
    }
    Ok(())
}
