use serde::{Deserialize, Serialize};
use surety_common::{Address, FlightKey, Result, Wei};
use surety_ledger::{AdminGate, LedgerStore};
use tracing::{debug, info};

use super::payout::PayoutPolicy;

/// Outcome of crediting one flight's insurees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub flight_key: Option<FlightKey>,
    /// Passenger and the amount added to their credit, in insuree order.
    pub credited: Vec<(Address, Wei)>,
    pub total: Wei,
}

/// Holds no state of its own: balances live in the [`LedgerStore`], and every
/// mutation is gated on the caller being an authorized principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscrowEngine {
    policy: PayoutPolicy,
}

impl EscrowEngine {
    pub fn new(policy: PayoutPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PayoutPolicy {
        &self.policy
    }

    /// Records `amount` as the passenger's premium for `key`, overwriting an
    /// earlier purchase for the same flight.
    pub fn buy(
        &self,
        store: &mut LedgerStore,
        gate: &dyn AdminGate,
        caller: &Address,
        passenger: Address,
        key: FlightKey,
        amount: Wei,
    ) -> Result<()> {
        gate.require_authorized(caller)?;

        let record = store.passenger_mut(passenger);
        record.flights_insured.insert(key, amount);
        record.history.push(key);
        store.push_insuree(key, passenger);

        info!("🛡️ {} insured flight {} for {} wei", passenger, key, amount);
        Ok(())
    }

    /// Pays every insuree of `key` the multiplied premium and clears the list.
    ///
    /// Insured amounts are zeroed as they are credited, so a passenger listed
    /// twice is paid once and a second call for the same key credits nothing.
    pub fn credit_insurees(
        &self,
        store: &mut LedgerStore,
        gate: &dyn AdminGate,
        caller: &Address,
        key: FlightKey,
    ) -> Result<Settlement> {
        gate.require_authorized(caller)?;

        let mut settlement = Settlement {
            flight_key: Some(key),
            ..Default::default()
        };

        for passenger in store.take_insurees(&key) {
            let record = store.passenger_mut(passenger);
            let insured = record.flights_insured.insert(key, 0).unwrap_or(0);
            if insured == 0 {
                continue;
            }

            let payout = self.policy.apply(insured);
            record.credit = record.credit.saturating_add(payout);
            settlement.total = settlement.total.saturating_add(payout);
            settlement.credited.push((passenger, payout));
            debug!("credited {} wei to {} for {}", payout, passenger, key);
        }

        info!(
            "💸 Flight {} settled: {} insurees credited, {} wei total",
            key,
            settlement.credited.len(),
            settlement.total
        );
        Ok(settlement)
    }

    /// Returns the passenger's whole credit and zeroes it in the same step.
    pub fn withdraw(
        &self,
        store: &mut LedgerStore,
        gate: &dyn AdminGate,
        caller: &Address,
        passenger: Address,
    ) -> Result<Wei> {
        gate.require_authorized(caller)?;

        if store.passenger(&passenger).is_none() {
            return Ok(0);
        }
        let amount = std::mem::take(&mut store.passenger_mut(passenger).credit);

        if amount > 0 {
            info!("🏧 {} withdrew {} wei", passenger, amount);
        }
        Ok(amount)
    }

    pub fn balance_of(&self, store: &LedgerStore, passenger: &Address) -> Wei {
        store.passenger(passenger).map_or(0, |p| p.credit)
    }

    pub fn insured_amount(&self, store: &LedgerStore, passenger: &Address, key: &FlightKey) -> Wei {
        store.passenger(passenger).map_or(0, |p| p.insured_amount(key))
    }

    /// Flights the passenger has insured, oldest first.
    pub fn history_of(&self, store: &LedgerStore, passenger: &Address) -> Vec<FlightKey> {
        store
            .passenger(passenger)
            .map(|p| p.history.clone())
            .unwrap_or_default()
    }
}
