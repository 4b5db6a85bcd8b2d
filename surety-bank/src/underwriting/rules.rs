use surety_common::{Result, SuretyError, Wei};
use surety_ledger::AirlineDirectory;

use super::{traits::UnderwritingRule, Purchase};

/// Caps the premium for a single flight.
pub struct MaxPremiumRule {
    pub max: Wei,
}

impl UnderwritingRule for MaxPremiumRule {
    fn name(&self) -> &str {
        "Max premium"
    }

    fn check(&self, purchase: &Purchase, _airlines: &dyn AirlineDirectory) -> Result<()> {
        if purchase.amount > self.max {
            return Err(SuretyError::PremiumTooHigh {
                amount: purchase.amount,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Only flights of registered, funded airlines can be insured.
pub struct ParticipatingAirlineRule;

impl UnderwritingRule for ParticipatingAirlineRule {
    fn name(&self) -> &str {
        "Participating airline"
    }

    fn check(&self, purchase: &Purchase, airlines: &dyn AirlineDirectory) -> Result<()> {
        if !airlines.is_registered(&purchase.airline) {
            return Err(SuretyError::AirlineNotRegistered(purchase.airline));
        }
        if !airlines.is_funded(&purchase.airline) {
            return Err(SuretyError::AirlineNotFunded(purchase.airline));
        }
        Ok(())
    }
}
