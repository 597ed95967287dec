use serde::{Deserialize, Serialize};

use crate::domain::errors::{PayoutError, PayoutResult};

/// The four per-creator balance buckets, in minor units.
///
/// Every transition preserves `locked + available + withdrawn == total`;
/// the postgres layer applies these transitions inside a row-locked
/// transaction so the stored ledger can never drift from the postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSet {
    pub total_earnings_minor: i64,
    pub locked_balance_minor: i64,
    pub available_balance_minor: i64,
    pub total_withdrawn_minor: i64,
}

impl BalanceSet {
    pub fn credit_locked(self, amount_minor: i64) -> PayoutResult<Self> {
        Self::require_positive(amount_minor)?;

        Ok(Self {
            total_earnings_minor: self.total_earnings_minor + amount_minor,
            locked_balance_minor: self.locked_balance_minor + amount_minor,
            ..self
        })
    }

    pub fn unlock_to_available(self, amount_minor: i64) -> PayoutResult<Self> {
        Self::require_positive(amount_minor)?;

        if self.locked_balance_minor < amount_minor {
            return Err(PayoutError::InsufficientLocked);
        }

        Ok(Self {
            locked_balance_minor: self.locked_balance_minor - amount_minor,
            available_balance_minor: self.available_balance_minor + amount_minor,
            ..self
        })
    }

    pub fn debit_available(self, amount_minor: i64) -> PayoutResult<Self> {
        Self::require_positive(amount_minor)?;

        if self.available_balance_minor < amount_minor {
            return Err(PayoutError::InsufficientAvailable);
        }

        Ok(Self {
            available_balance_minor: self.available_balance_minor - amount_minor,
            total_withdrawn_minor: self.total_withdrawn_minor + amount_minor,
            ..self
        })
    }

    /// Inverse of [`Self::debit_available`]; only valid while the matching
    /// debit is still reflected in `total_withdrawn_minor`.
    pub fn reverse_debit(self, amount_minor: i64) -> PayoutResult<Self> {
        Self::require_positive(amount_minor)?;

        if self.total_withdrawn_minor < amount_minor {
            return Err(PayoutError::Internal(anyhow::anyhow!(
                "reversal of {amount_minor} exceeds total withdrawn {}",
                self.total_withdrawn_minor
            )));
        }

        Ok(Self {
            available_balance_minor: self.available_balance_minor + amount_minor,
            total_withdrawn_minor: self.total_withdrawn_minor - amount_minor,
            ..self
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.locked_balance_minor >= 0
            && self.available_balance_minor >= 0
            && self.total_withdrawn_minor >= 0
            && self.total_earnings_minor
                == self.locked_balance_minor
                    + self.available_balance_minor
                    + self.total_withdrawn_minor
    }

    fn require_positive(amount_minor: i64) -> PayoutResult<()> {
        if amount_minor <= 0 {
            return Err(PayoutError::InvalidAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> BalanceSet {
        BalanceSet {
            total_earnings_minor: 5000,
            locked_balance_minor: 2000,
            available_balance_minor: 2500,
            total_withdrawn_minor: 500,
        }
    }

    #[test]
    fn credit_locked_grows_total_and_locked() {
        let after = seeded().credit_locked(1250).unwrap();

        assert_eq!(after.total_earnings_minor, 6250);
        assert_eq!(after.locked_balance_minor, 3250);
        assert!(after.is_consistent());
    }

    #[test]
    fn unlock_moves_locked_to_available() {
        let after = seeded().unlock_to_available(1250).unwrap();

        assert_eq!(after.locked_balance_minor, 750);
        assert_eq!(after.available_balance_minor, 3750);
        assert_eq!(after.total_earnings_minor, 5000);
        assert!(after.is_consistent());
    }

    #[test]
    fn debit_moves_available_to_withdrawn() {
        let after = seeded().debit_available(1000).unwrap();

        assert_eq!(after.available_balance_minor, 1500);
        assert_eq!(after.total_withdrawn_minor, 1500);
        assert!(after.is_consistent());
    }

    #[test]
    fn reverse_debit_undoes_a_debit() {
        let debited = seeded().debit_available(1000).unwrap();
        let reversed = debited.reverse_debit(1000).unwrap();

        assert_eq!(reversed, seeded());
    }

    #[test]
    fn non_positive_amounts_are_rejected_everywhere() {
        for amount in [0, -1] {
            assert!(matches!(
                seeded().credit_locked(amount),
                Err(PayoutError::InvalidAmount)
            ));
            assert!(matches!(
                seeded().unlock_to_available(amount),
                Err(PayoutError::InvalidAmount)
            ));
            assert!(matches!(
                seeded().debit_available(amount),
                Err(PayoutError::InvalidAmount)
            ));
            assert!(matches!(
                seeded().reverse_debit(amount),
                Err(PayoutError::InvalidAmount)
            ));
        }
    }

    #[test]
    fn unlock_beyond_locked_balance_fails() {
        assert!(matches!(
            seeded().unlock_to_available(2001),
            Err(PayoutError::InsufficientLocked)
        ));
    }

    #[test]
    fn debit_beyond_available_balance_fails() {
        assert!(matches!(
            seeded().debit_available(2501),
            Err(PayoutError::InsufficientAvailable)
        ));
    }

    #[test]
    fn reversal_beyond_withdrawn_total_fails() {
        assert!(matches!(
            seeded().reverse_debit(501),
            Err(PayoutError::Internal(_))
        ));
    }

    #[test]
    fn drifted_set_is_detected() {
        let drifted = BalanceSet {
            total_earnings_minor: 5001,
            ..seeded()
        };
        assert!(!drifted.is_consistent());
    }
}
