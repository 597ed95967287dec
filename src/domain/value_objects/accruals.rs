use serde::{Deserialize, Serialize};

use crate::domain::errors::{PayoutError, PayoutResult};

/// A single posting from the view-accrual feed: non-negative increments to a
/// video's current-period counters. The rate math behind `earnings_minor`
/// is the feed's concern; the core treats it as authoritative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccrualDelta {
    pub earnings_minor: i64,
    pub views: i64,
    pub premium_views: i64,
}

impl AccrualDelta {
    pub fn validate(&self) -> PayoutResult<()> {
        if self.earnings_minor < 0 || self.views < 0 || self.premium_views < 0 {
            return Err(PayoutError::InvalidAmount);
        }
        if self.premium_views > self.views {
            return Err(PayoutError::InvalidAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_positive_components() {
        let delta = AccrualDelta {
            earnings_minor: 0,
            views: 10,
            premium_views: 3,
        };
        assert!(delta.validate().is_ok());
    }

    #[test]
    fn rejects_negative_components() {
        let delta = AccrualDelta {
            earnings_minor: -1,
            views: 10,
            premium_views: 0,
        };
        assert!(matches!(delta.validate(), Err(PayoutError::InvalidAmount)));
    }

    #[test]
    fn rejects_premium_views_exceeding_views() {
        let delta = AccrualDelta {
            earnings_minor: 5,
            views: 2,
            premium_views: 3,
        };
        assert!(matches!(delta.validate(), Err(PayoutError::InvalidAmount)));
    }
}
