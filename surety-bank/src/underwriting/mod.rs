pub mod rules;
pub mod service;
pub mod traits;

use serde::{Deserialize, Serialize};
use surety_common::{Address, FlightKey, Wei};

/// A passenger's request to insure one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub passenger: Address,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub amount: Wei,
}

impl Purchase {
    pub fn flight_key(&self) -> FlightKey {
        FlightKey::new(&self.airline, &self.flight, self.timestamp)
    }
}
