use std::sync::Arc;

use surety_common::{Result, Wei};
use surety_ledger::AirlineDirectory;
use tracing::warn;

use super::{
    rules::{MaxPremiumRule, ParticipatingAirlineRule},
    traits::UnderwritingRule,
    Purchase,
};

#[derive(Clone, Default)]
pub struct UnderwritingService {
    rules: Vec<Arc<dyn UnderwritingRule>>,
}

impl UnderwritingService {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Premium cap plus the participating-airline check.
    pub fn standard(max_premium: Wei) -> Self {
        let mut service = Self::new();
        service.add_rule(Arc::new(MaxPremiumRule { max: max_premium }));
        service.add_rule(Arc::new(ParticipatingAirlineRule));
        service
    }

    pub fn add_rule(&mut self, rule: Arc<dyn UnderwritingRule>) {
        self.rules.push(rule);
    }

    /// First failing rule wins.
    pub fn check(&self, purchase: &Purchase, airlines: &dyn AirlineDirectory) -> Result<()> {
        for rule in &self.rules {
            rule.check(purchase, airlines).map_err(|e| {
                warn!("Underwriting rule [{}] rejected purchase: {}", rule.name(), e);
                e
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for UnderwritingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("UnderwritingService").field("rules", &names).finish()
    }
}
