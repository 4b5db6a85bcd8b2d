use serde::{Deserialize, Serialize};
use surety_common::{Address, Result, SuretyError};
use tracing::info;

use crate::{admin::AdminGate, store::LedgerStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub name: String,
    pub registered: bool,
    pub funded: bool,
}

impl Airline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registered: true,
            funded: false,
        }
    }
}

/// Read-only view of airline bookkeeping used to decide whether a delay is
/// attributable to a participating airline.
pub trait AirlineDirectory {
    fn is_registered(&self, airline: &Address) -> bool;
    fn is_funded(&self, airline: &Address) -> bool;
}

impl AirlineDirectory for LedgerStore {
    fn is_registered(&self, airline: &Address) -> bool {
        self.airline(airline).map_or(false, |a| a.registered)
    }

    fn is_funded(&self, airline: &Address) -> bool {
        self.airline(airline).map_or(false, |a| a.funded)
    }
}

/// Registers (or renames) an airline on behalf of an authorized caller.
pub fn register_airline(
    store: &mut LedgerStore,
    gate: &dyn AdminGate,
    caller: &Address,
    airline: Address,
    name: &str,
) -> Result<()> {
    gate.require_authorized(caller)?;

    let mut record = store.airline(&airline).cloned().unwrap_or_default();
    record.name = name.to_string();
    record.registered = true;
    store.set_airline(airline, record);

    info!("✈️ Airline registered: {} ({})", name, airline);
    Ok(())
}

/// Marks an airline as funded. Funding is accepted while paused.
pub fn fund_airline(
    store: &mut LedgerStore,
    gate: &dyn AdminGate,
    caller: &Address,
    airline: Address,
) -> Result<()> {
    if !gate.is_authorized(caller) {
        return Err(SuretyError::NotAuthorizedCaller(*caller));
    }

    let mut record = store.airline(&airline).cloned().unwrap_or_default();
    record.funded = true;
    store.set_airline(airline, record);

    info!("💰 Airline funded: {}", airline);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::Administrator;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn test_register_and_fund_airline() {
        let owner = addr(1);
        let app = addr(2);
        let airline = addr(3);

        let mut admin = Administrator::new(owner);
        admin.authorize(&owner, app).unwrap();
        let mut store = LedgerStore::new();

        assert!(!store.is_registered(&airline));
        register_airline(&mut store, &admin, &app, airline, "#2 Airline").unwrap();
        assert!(store.is_registered(&airline));
        assert!(!store.is_funded(&airline));

        fund_airline(&mut store, &admin, &app, airline).unwrap();
        assert!(store.is_funded(&airline));
        assert_eq!(store.airline(&airline).unwrap().name, "#2 Airline");
    }

    #[test]
    fn test_unauthorized_caller_cannot_register() {
        let owner = addr(1);
        let admin = Administrator::new(owner);
        let mut store = LedgerStore::new();

        let res = register_airline(&mut store, &admin, &addr(9), addr(3), "Rogue Air");
        assert!(matches!(res, Err(SuretyError::NotAuthorizedCaller(_))));
        assert!(store.airline(&addr(3)).is_none());
    }

    #[test]
    fn test_register_rejected_while_paused_but_fund_allowed() {
        let owner = addr(1);
        let app = addr(2);
        let mut admin = Administrator::new(owner);
        admin.authorize(&owner, app).unwrap();
        admin.set_operational_status(&owner, false).unwrap();
        let mut store = LedgerStore::new();

        let res = register_airline(&mut store, &admin, &app, addr(3), "Paused Air");
        assert!(matches!(res, Err(SuretyError::NotOperational)));

        fund_airline(&mut store, &admin, &app, addr(3)).unwrap();
        assert!(store.is_funded(&addr(3)));
        assert!(!store.is_registered(&addr(3)));
    }
}
