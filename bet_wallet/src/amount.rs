//! Fixed-point monetary amounts.
//!
//! Amounts arrive as decimal strings and stay in `rust_decimal::Decimal` all the
//! way to the `NUMERIC(20, 4)` columns, so no floating-point rounding is ever
//! involved.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of fractional digits the store keeps.
pub const MAX_SCALE: u32 = 4;

/// Exclusive upper bound for a single amount (16 integer digits).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

const MAX_INTEGER_DIGITS: usize = 16;

/// Reasons an amount string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is not a valid decimal: {0:?}")]
    Malformed(String),

    #[error("amount must not be negative: {0}")]
    Negative(String),

    #[error("amount has more than {MAX_SCALE} decimal places: {0}")]
    TooPrecise(String),

    #[error("amount is too large: {0}")]
    TooLarge(String),
}

/// A validated, non-negative monetary amount.
///
/// # Examples
///
/// ```
/// use bet_wallet::Amount;
///
/// let amount: Amount = "30.50".parse().unwrap();
/// assert_eq!(amount.to_string(), "30.5");
/// assert!("-1".parse::<Amount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Validates a decimal value as an amount.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value.to_string()));
        }

        let normalized = value.normalize();
        if normalized.scale() > MAX_SCALE {
            return Err(AmountError::TooPrecise(value.to_string()));
        }
        if normalized >= MAX_AMOUNT {
            return Err(AmountError::TooLarge(value.to_string()));
        }

        Ok(Amount(normalized))
    }

    /// The underlying decimal value.
    pub fn value(self) -> Decimal {
        self.0
    }
}

/// Check that `s` is `[+-]digits[.digits]` and fits the scale and size limits.
///
/// Runs before `Decimal::from_str`, which would otherwise accept `_`
/// separators and round away fractional digits past its own precision.
fn check_shape(s: &str) -> Result<(), AmountError> {
    let unsigned = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
        return Err(AmountError::Malformed(s.to_string()));
    }

    if fraction.is_some_and(|f| f.trim_end_matches('0').len() > MAX_SCALE as usize) {
        return Err(AmountError::TooPrecise(s.to_string()));
    }
    if integer.trim_start_matches('0').len() > MAX_INTEGER_DIGITS {
        return Err(AmountError::TooLarge(s.to_string()));
    }

    Ok(())
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        check_shape(trimmed)?;
        let value =
            Decimal::from_str(trimmed).map_err(|_| AmountError::Malformed(s.to_string()))?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_values() {
        assert_eq!("30".parse::<Amount>().unwrap().value(), Decimal::from(30));
        assert_eq!(
            "  12.5  ".parse::<Amount>().unwrap().value(),
            Decimal::new(125, 1)
        );
        assert_eq!("0".parse::<Amount>().unwrap().value(), Decimal::ZERO);
        assert_eq!("0.0000".parse::<Amount>().unwrap().value(), Decimal::ZERO);
        assert_eq!("+7".parse::<Amount>().unwrap().value(), Decimal::from(7));
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let amount: Amount = "1.50000000".parse().unwrap();
        assert_eq!(amount.value(), Decimal::new(15, 1));
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "", "abc", "1.2.3", "1,000", "ten", "1_000", "1e3", ".5", "5.", "-", "0x10", "1 000",
        ] {
            assert!(
                matches!(input.parse::<Amount>(), Err(AmountError::Malformed(_))),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            "-0.01".parse::<Amount>(),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn test_rejects_excess_precision() {
        for input in [
            "0.00001",
            "1.00000000000000000000000000001",
            "0.0000000000000000000000000000001",
        ] {
            assert!(
                matches!(input.parse::<Amount>(), Err(AmountError::TooPrecise(_))),
                "{input:?} should be too precise"
            );
        }
    }

    #[test]
    fn test_max_amount_bound() {
        assert_eq!(MAX_AMOUNT, Decimal::from(10_000_000_000_000_000_i64));
        assert!("9999999999999999.9999".parse::<Amount>().is_ok());
        assert!(matches!(
            "10000000000000000".parse::<Amount>(),
            Err(AmountError::TooLarge(_))
        ));
        assert!(matches!(
            "123456789012345678901234567890123".parse::<Amount>(),
            Err(AmountError::TooLarge(_))
        ));
        assert!("0000000000000000000042".parse::<Amount>().is_ok());
    }

    proptest! {
        #[test]
        fn prop_minor_units_round_trip_exactly(units in 0i64..1_000_000_000_000, scale in 0u32..=4) {
            let expected = Decimal::new(units, scale);
            let parsed: Amount = expected.to_string().parse().unwrap();
            prop_assert_eq!(parsed.value(), expected);
        }

        #[test]
        fn prop_parse_never_panics(input in ".{0,32}") {
            let _ = input.parse::<Amount>();
        }
    }
}
