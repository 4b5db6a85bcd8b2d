use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use surety_common::{params::INDICES_PER_ORACLE, Address, FlightKey};

use crate::{airline::Airline, passenger::Passenger};

/// Plain keyed storage. No checks happen here; callers own the policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerStore {
    airlines: HashMap<Address, Airline>,
    passengers: HashMap<Address, Passenger>,
    /// Flight key -> passengers who insured it, in purchase order.
    insurees: HashMap<FlightKey, Vec<Address>>,
    /// Oracle -> its assigned indices.
    oracles: HashMap<Address, [u8; INDICES_PER_ORACLE]>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one airline registered up front, as at deployment.
    pub fn with_first_airline(address: Address, name: &str) -> Self {
        let mut store = Self::new();
        store.set_airline(address, Airline::new(name));
        store
    }

    pub fn airline(&self, address: &Address) -> Option<&Airline> {
        self.airlines.get(address)
    }

    pub fn set_airline(&mut self, address: Address, airline: Airline) {
        self.airlines.insert(address, airline);
    }

    pub fn passenger(&self, address: &Address) -> Option<&Passenger> {
        self.passengers.get(address)
    }

    /// Mutable record, created empty on first touch.
    pub fn passenger_mut(&mut self, address: Address) -> &mut Passenger {
        self.passengers.entry(address).or_default()
    }

    pub fn insurees(&self, key: &FlightKey) -> &[Address] {
        self.insurees.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push_insuree(&mut self, key: FlightKey, passenger: Address) {
        self.insurees.entry(key).or_default().push(passenger);
    }

    /// Removes and returns the flight's insuree list.
    pub fn take_insurees(&mut self, key: &FlightKey) -> Vec<Address> {
        self.insurees.remove(key).unwrap_or_default()
    }

    pub fn oracle_indexes(&self, oracle: &Address) -> Option<[u8; INDICES_PER_ORACLE]> {
        self.oracles.get(oracle).copied()
    }

    pub fn set_oracle_indexes(&mut self, oracle: Address, indexes: [u8; INDICES_PER_ORACLE]) {
        self.oracles.insert(oracle, indexes);
    }

    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn test_insuree_list_keeps_order_and_take_clears() {
        let mut store = LedgerStore::new();
        let key = FlightKey::new(&addr(1), "ND1309", 10);

        store.push_insuree(key, addr(5));
        store.push_insuree(key, addr(4));
        assert_eq!(store.insurees(&key), &[addr(5), addr(4)]);

        assert_eq!(store.take_insurees(&key), vec![addr(5), addr(4)]);
        assert!(store.insurees(&key).is_empty());
        assert!(store.take_insurees(&key).is_empty());
    }

    #[test]
    fn test_passenger_created_on_first_touch() {
        let mut store = LedgerStore::new();
        assert!(store.passenger(&addr(2)).is_none());

        store.passenger_mut(addr(2)).credit = 7;
        assert_eq!(store.passenger(&addr(2)).unwrap().credit, 7);
    }

    #[test]
    fn test_first_airline_is_registered() {
        let store = LedgerStore::with_first_airline(addr(3), "#1 Airline");
        let airline = store.airline(&addr(3)).unwrap();
        assert!(airline.registered);
        assert!(!airline.funded);
    }
}
