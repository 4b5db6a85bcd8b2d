use serde::{Deserialize, Serialize};
use surety_common::{
    params::{PAYOUT_DENOMINATOR, PAYOUT_NUMERATOR},
    Wei,
};

/// Fixed payout multiplier, `numerator / denominator`, truncating toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutPolicy {
    pub numerator: Wei,
    pub denominator: Wei,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        Self {
            numerator: PAYOUT_NUMERATOR,
            denominator: PAYOUT_DENOMINATOR,
        }
    }
}

impl PayoutPolicy {
    /// `insured * numerator / denominator` without overflowing the product.
    pub fn apply(&self, insured: Wei) -> Wei {
        let whole = insured / self.denominator;
        let rest = insured % self.denominator;
        whole
            .saturating_mul(self.numerator)
            .saturating_add(rest * self.numerator / self.denominator)
    }
}
