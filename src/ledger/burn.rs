//! Burn fee arithmetic
//!
//! Every transfer destroys `floor(amount * 5 / 100)` base units. The split is
//! computed with integer arithmetic only; the fractional remainder of the
//! division stays with the recipient.

use serde::{Deserialize, Serialize};

use crate::types::Amount;

/// Percentage of every transfer that is burned
pub const BURN_RATE_PERCENT: Amount = 5;

const PERCENT_BASE: Amount = 100;

/// A gross transfer amount split into its burned and credited parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnSplit {
    /// Amount debited from the sender
    pub gross: Amount,
    /// Amount removed from total supply
    pub burned: Amount,
    /// Amount credited to the recipient
    pub net: Amount,
}

impl BurnSplit {
    /// Split `gross` into burn and net
    ///
    /// Equal to `gross * 5 / 100` truncated, but evaluated as
    /// `(gross / 100) * 5 + (gross % 100) * 5 / 100` so it cannot overflow.
    pub fn compute(gross: Amount) -> Self {
        let burned = (gross / PERCENT_BASE) * BURN_RATE_PERCENT
            + (gross % PERCENT_BASE) * BURN_RATE_PERCENT / PERCENT_BASE;
        Self {
            gross,
            burned,
            net: gross - burned,
        }
    }
}

/// Burned portion of a transfer of `gross`
pub fn burn_amount(gross: Amount) -> Amount {
    BurnSplit::compute(gross).burned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_percent_of_round_amounts() {
        let split = BurnSplit::compute(1000);
        assert_eq!(split.burned, 50);
        assert_eq!(split.net, 950);

        let split = BurnSplit::compute(2000);
        assert_eq!(split.burned, 100);
        assert_eq!(split.net, 1900);
    }

    #[test]
    fn test_burn_truncates_toward_zero() {
        // 5% of 19 is 0.95
        assert_eq!(burn_amount(19), 0);
        assert_eq!(BurnSplit::compute(19).net, 19);

        // 5% of 39 is 1.95
        assert_eq!(burn_amount(39), 1);
        assert_eq!(burn_amount(20), 1);
        assert_eq!(burn_amount(0), 0);
    }

    #[test]
    fn test_matches_naive_formula() {
        for gross in [1u128, 7, 99, 100, 101, 12_345, 999_999, 10u128.pow(24) + 17] {
            assert_eq!(burn_amount(gross), gross * 5 / 100, "gross = {gross}");
        }
    }

    #[test]
    fn test_no_overflow_at_maximum() {
        let split = BurnSplit::compute(Amount::MAX);
        assert_eq!(split.burned + split.net, Amount::MAX);
        assert!(split.burned <= Amount::MAX / 20 + 1);
    }
}
