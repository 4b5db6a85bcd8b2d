use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use surety_common::{
    params::{MAX_PREMIUM, ONE_ETHER, REGISTRATION_FEE},
    Address, Result, StatusCode, SuretyError, Wei,
};

use crate::runtime::{app::AppSettings, oracle_sim::SimulationSettings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineConfig {
    pub address: Address,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightConfig {
    pub airline: Address,
    pub flight: String,
    /// Departure as unix seconds. Resolved to the current time when absent.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseConfig {
    pub passenger: Address,
    pub flight: String,
    pub amount: Wei,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: Option<u64>,
    pub owner: Address,
    pub app_address: Address,
    pub oracle_count: usize,
    pub silent_oracles: usize,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub forced_status: Option<StatusCode>,
    pub registration_fee: Wei,
    pub max_premium: Wei,
    pub settle_timeout_secs: u64,
    pub settle_attempts: usize,
    pub log_dir: String,
    pub snapshot_path: Option<String>,
    /// The first airline is registered at deployment and registers the rest.
    pub airlines: Vec<AirlineConfig>,
    pub flights: Vec<FlightConfig>,
    pub purchases: Vec<PurchaseConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let first = Address::from_bytes([0xa1; 20]);
        let second = Address::from_bytes([0xa2; 20]);
        Self {
            seed: None,
            owner: Address::from_bytes([0x11; 20]),
            app_address: Address::from_bytes([0x22; 20]),
            oracle_count: 20,
            silent_oracles: 0,
            min_latency_ms: 10,
            max_latency_ms: 250,
            forced_status: None,
            registration_fee: REGISTRATION_FEE,
            max_premium: MAX_PREMIUM,
            settle_timeout_secs: 3,
            settle_attempts: 5,
            log_dir: "logs".to_string(),
            snapshot_path: None,
            airlines: vec![
                AirlineConfig {
                    address: first,
                    name: "#1 Airline".to_string(),
                },
                AirlineConfig {
                    address: second,
                    name: "#2 Airline".to_string(),
                },
            ],
            flights: vec![
                FlightConfig {
                    airline: first,
                    flight: "ND1309".to_string(),
                    timestamp: None,
                },
                FlightConfig {
                    airline: second,
                    flight: "SR2024".to_string(),
                    timestamp: None,
                },
            ],
            purchases: vec![
                PurchaseConfig {
                    passenger: Address::from_bytes([0xc1; 20]),
                    flight: "ND1309".to_string(),
                    amount: ONE_ETHER,
                },
                PurchaseConfig {
                    passenger: Address::from_bytes([0xc2; 20]),
                    flight: "SR2024".to_string(),
                    amount: ONE_ETHER / 2,
                },
            ],
        }
    }
}

impl Config {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed = serde_json::from_str::<Config>(&data)?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_latency_ms > self.max_latency_ms {
            return Err(SuretyError::Config(format!(
                "min_latency_ms ({}) exceeds max_latency_ms ({})",
                self.min_latency_ms, self.max_latency_ms
            )));
        }
        if self.silent_oracles > self.oracle_count {
            return Err(SuretyError::Config(format!(
                "silent_oracles ({}) exceeds oracle_count ({})",
                self.silent_oracles, self.oracle_count
            )));
        }
        if self.airlines.is_empty() {
            return Err(SuretyError::Config("at least one airline is required".to_string()));
        }

        let airlines: HashSet<&Address> = self.airlines.iter().map(|a| &a.address).collect();
        for flight in &self.flights {
            if !airlines.contains(&flight.airline) {
                return Err(SuretyError::Config(format!(
                    "flight {} belongs to unknown airline {}",
                    flight.flight, flight.airline
                )));
            }
        }
        for purchase in &self.purchases {
            if self.flight(&purchase.flight).is_none() {
                return Err(SuretyError::Config(format!(
                    "purchase by {} names unknown flight {}",
                    purchase.passenger, purchase.flight
                )));
            }
        }
        Ok(())
    }

    pub fn flight(&self, code: &str) -> Option<&FlightConfig> {
        self.flights.iter().find(|f| f.flight == code)
    }

    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            registration_fee: self.registration_fee,
            max_premium: self.max_premium,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            oracle_count: self.oracle_count,
            silent_oracles: self.silent_oracles,
            min_latency_ms: self.min_latency_ms,
            max_latency_ms: self.max_latency_ms,
            forced_status: self.forced_status,
            registration_fee: self.registration_fee,
            // Oracle addresses must not follow the index stream.
            seed: self.seed.map(|s| s.wrapping_add(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("surety.json");

        let mut config = Config::default();
        config.seed = Some(42);
        config.forced_status = Some(StatusCode::LateAirline);
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "oracle_count": 7, "forced_status": 20 }"#).unwrap();
        assert_eq!(config.oracle_count, 7);
        assert_eq!(config.forced_status, Some(StatusCode::LateAirline));
        assert_eq!(config.registration_fee, REGISTRATION_FEE);
    }

    #[test]
    fn test_rejects_bad_status_code() {
        let res = serde_json::from_str::<Config>(r#"{ "forced_status": 25 }"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_validate_catches_inconsistencies() {
        let mut config = Config::default();
        config.min_latency_ms = 500;
        assert!(matches!(config.validate(), Err(SuretyError::Config(_))));

        let mut config = Config::default();
        config.purchases[0].flight = "XX0000".to_string();
        assert!(matches!(config.validate(), Err(SuretyError::Config(_))));

        let mut config = Config::default();
        config.airlines.clear();
        assert!(matches!(config.validate(), Err(SuretyError::Config(_))));
    }
}
