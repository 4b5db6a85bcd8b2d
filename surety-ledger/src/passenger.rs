use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use surety_common::{FlightKey, Wei};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Premium currently insured per flight. Zeroed when the flight settles.
    pub flights_insured: HashMap<FlightKey, Wei>,
    /// Every flight ever insured, in purchase order.
    pub history: Vec<FlightKey>,
    /// Withdrawable payout.
    pub credit: Wei,
}

impl Passenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insured_amount(&self, key: &FlightKey) -> Wei {
        *self.flights_insured.get(key).unwrap_or(&0)
    }
}
