use surety_common::Result;
use surety_ledger::AirlineDirectory;

use super::Purchase;

/// A rule that must be satisfied before a purchase reaches escrow.
pub trait UnderwritingRule: Send + Sync {
    /// Returns the name of the rule for logging/debugging.
    fn name(&self) -> &str;

    /// Returns Ok(()) if the purchase is acceptable.
    fn check(&self, purchase: &Purchase, airlines: &dyn AirlineDirectory) -> Result<()>;
}
