use std::{fs, path::Path};

use surety_common::Result;

use crate::store::LedgerStore;

/// Writes the ledger store to `path` as pretty JSON.
pub fn save_snapshot<P: AsRef<Path>>(path: P, store: &LedgerStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a ledger store previously written by [`save_snapshot`].
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<LedgerStore> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::{Address, FlightKey};
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_and_load_snapshot() {
        let airline = Address::from_bytes([1; 20]);
        let passenger = Address::from_bytes([2; 20]);
        let oracle = Address::from_bytes([3; 20]);
        let key = FlightKey::new(&airline, "ND1309", 1_700_000_000);

        let mut store = LedgerStore::with_first_airline(airline, "#1 Airline");
        store.passenger_mut(passenger).flights_insured.insert(key, 100);
        store.passenger_mut(passenger).history.push(key);
        store.passenger_mut(passenger).credit = 15;
        store.push_insuree(key, passenger);
        store.set_oracle_indexes(oracle, [1, 4, 4]);

        let file = NamedTempFile::new().unwrap();
        save_snapshot(file.path(), &store).unwrap();
        let loaded = load_snapshot(file.path()).unwrap();

        assert_eq!(loaded.airline(&airline), store.airline(&airline));
        assert_eq!(loaded.passenger(&passenger), store.passenger(&passenger));
        assert_eq!(loaded.insurees(&key), &[passenger]);
        assert_eq!(loaded.oracle_indexes(&oracle), Some([1, 4, 4]));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_snapshot(dir.path().join("missing.json"));
        assert!(matches!(res, Err(surety_common::SuretyError::Io(_))));
    }
}
