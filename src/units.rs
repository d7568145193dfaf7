//! Fee-currency amounts
//!
//! Balances on the wire are decimal strings of MIST (1 SUI = 10^9 MIST). All
//! arithmetic here is exact integer arithmetic; nothing goes through floats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use thiserror::Error;

/// Number of MIST in one SUI
pub const MIST_PER_SUI: u128 = 1_000_000_000;

/// Decimal places of a SUI amount
const SUI_DECIMALS: usize = 9;

/// Decimal places shown by [`format_sui`]
const DISPLAY_DECIMALS: u32 = 4;

/// An amount of the fee currency in its smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Mist(pub u128);

impl Mist {
    pub const ZERO: Mist = Mist(0);

    pub fn as_u128(self) -> u128 {
        self.0
    }

    /// Difference to `other`, zero when `other` is not larger
    pub fn shortfall_to(self, other: Mist) -> Mist {
        Mist(other.0.saturating_sub(self.0))
    }
}

impl From<u64> for Mist {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl Add for Mist {
    type Output = Mist;

    fn add(self, rhs: Mist) -> Mist {
        // u64 balances summed into u128 cannot overflow in practice
        Mist(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Mist {
    fn sum<I: Iterator<Item = Mist>>(iter: I) -> Mist {
        iter.fold(Mist::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Mist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MIST", self.0)
    }
}

/// Format a MIST amount as SUI with four decimals, rounding half up
///
/// `format_sui(Mist(100_000_000))` is `"0.1000"`.
pub fn format_sui(amount: Mist) -> String {
    let step = MIST_PER_SUI / 10u128.pow(DISPLAY_DECIMALS);
    let rounded = amount.0.saturating_add(step / 2) / step;
    let scale = 10u128.pow(DISPLAY_DECIMALS);
    format!(
        "{}.{:0width$}",
        rounded / scale,
        rounded % scale,
        width = DISPLAY_DECIMALS as usize
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid SUI amount '{0}'")]
    Invalid(String),

    #[error("SUI amount '{0}' is too large")]
    Overflow(String),
}

/// Convert a decimal SUI string ("0.1", "2", "1.000000001") to MIST
///
/// Digits past the ninth decimal are dropped.
pub fn sui_to_mist(input: &str) -> Result<Mist, AmountParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountParseError::Invalid(input.to_string()));
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| AmountParseError::Overflow(input.to_string()))?
    };

    let mut frac_digits: String = frac.chars().take(SUI_DECIMALS).collect();
    while frac_digits.len() < SUI_DECIMALS {
        frac_digits.push('0');
    }
    let frac: u128 = frac_digits
        .parse()
        .map_err(|_| AmountParseError::Invalid(input.to_string()))?;

    whole
        .checked_mul(MIST_PER_SUI)
        .and_then(|w| w.checked_add(frac))
        .map(Mist)
        .ok_or_else(|| AmountParseError::Overflow(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_sui() {
        assert_eq!(format_sui(Mist(100_000_000)), "0.1000");
        assert_eq!(format_sui(Mist(0)), "0.0000");
        assert_eq!(format_sui(Mist(1_234_567_890)), "1.2346");
        assert_eq!(format_sui(Mist(49_999)), "0.0000");
        assert_eq!(format_sui(Mist(50_000)), "0.0001");
    }

    #[test]
    fn test_sui_to_mist() {
        assert_eq!(sui_to_mist("0.1").unwrap(), Mist(100_000_000));
        assert_eq!(sui_to_mist("2").unwrap(), Mist(2_000_000_000));
        assert_eq!(sui_to_mist(".5").unwrap(), Mist(500_000_000));
        assert_eq!(sui_to_mist("1.0000000019").unwrap(), Mist(1_000_000_001));
    }

    #[test]
    fn test_sui_to_mist_rejects_garbage() {
        assert_eq!(sui_to_mist(""), Err(AmountParseError::Empty));
        assert!(matches!(sui_to_mist("-1"), Err(AmountParseError::Invalid(_))));
        assert!(matches!(sui_to_mist("1.2.3"), Err(AmountParseError::Invalid(_))));
        assert!(matches!(sui_to_mist("."), Err(AmountParseError::Invalid(_))));
        assert!(matches!(sui_to_mist("abc"), Err(AmountParseError::Invalid(_))));
    }

    #[test]
    fn test_shortfall() {
        assert_eq!(Mist(10).shortfall_to(Mist(15)), Mist(5));
        assert_eq!(Mist(15).shortfall_to(Mist(10)), Mist::ZERO);
    }

    proptest! {
        #[test]
        fn prop_sum_is_exact(balances in proptest::collection::vec(any::<u64>(), 0..64)) {
            let expected: u128 = balances.iter().map(|b| *b as u128).sum();
            let total: Mist = balances.into_iter().map(Mist::from).sum();
            prop_assert_eq!(total, Mist(expected));
        }

        #[test]
        fn prop_whole_sui_round_trips(whole in 0u64..1_000_000) {
            let mist = sui_to_mist(&whole.to_string()).unwrap();
            prop_assert_eq!(format_sui(mist), format!("{}.0000", whole));
        }
    }
}
