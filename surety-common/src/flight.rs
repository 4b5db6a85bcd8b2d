use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{address::Address, crypto::hash::flight_key_hash, error::SuretyError};

/// Deterministic identifier of one departure of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightKey(#[serde(with = "hex::serde")] [u8; 32]);

impl FlightKey {
    pub fn new(airline: &Address, flight: &str, timestamp: u64) -> Self {
        Self(flight_key_hash(airline, flight, timestamp))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Flight status reported by oracles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum StatusCode {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl StatusCode {
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Unknown,
        StatusCode::OnTime,
        StatusCode::LateAirline,
        StatusCode::LateWeather,
        StatusCode::LateTechnical,
        StatusCode::LateOther,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only a delay caused by the airline entitles passengers to a payout.
    pub fn is_airline_fault(self) -> bool {
        self == StatusCode::LateAirline
    }
}

impl From<StatusCode> for u8 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = SuretyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusCode::ALL
            .into_iter()
            .find(|s| s.code() == value)
            .ok_or(SuretyError::InvalidStatusCode(value))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::Unknown => "unknown",
            StatusCode::OnTime => "on-time",
            StatusCode::LateAirline => "late-airline",
            StatusCode::LateWeather => "late-weather",
            StatusCode::LateTechnical => "late-technical",
            StatusCode::LateOther => "late-other",
        };
        write!(f, "{} ({})", s, self.code())
    }
}

/// A flight-status request as seen by oracles: the requested index plus the
/// flight it asks about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleRequest {
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
}

impl OracleRequest {
    pub fn new(index: u8, airline: Address, flight: impl Into<String>, timestamp: u64) -> Self {
        Self {
            index,
            airline,
            flight: flight.into(),
            timestamp,
        }
    }

    pub fn flight_key(&self) -> FlightKey {
        FlightKey::new(&self.airline, &self.flight, self.timestamp)
    }
}

impl fmt::Display for OracleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}@{} idx={}", self.airline, self.flight, self.timestamp, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_round_trip_through_u8() {
        for status in StatusCode::ALL {
            assert_eq!(StatusCode::try_from(status.code()).unwrap(), status);
        }
        assert!(matches!(StatusCode::try_from(15), Err(SuretyError::InvalidStatusCode(15))));
    }

    #[test]
    fn test_only_late_airline_is_airline_fault() {
        let faults: Vec<_> = StatusCode::ALL.into_iter().filter(|s| s.is_airline_fault()).collect();
        assert_eq!(faults, vec![StatusCode::LateAirline]);
    }

    #[test]
    fn test_request_flight_key_ignores_index() {
        let airline = Address::from_bytes([9u8; 20]);
        let a = OracleRequest::new(1, airline, "ND1309", 42);
        let b = OracleRequest::new(7, airline, "ND1309", 42);
        assert_eq!(a.flight_key(), b.flight_key());
        assert_eq!(a.flight_key(), FlightKey::new(&airline, "ND1309", 42));
    }

    #[test]
    fn test_status_code_serializes_as_number() {
        assert_eq!(serde_json::to_string(&StatusCode::LateAirline).unwrap(), "20");
        let parsed: StatusCode = serde_json::from_str("30").unwrap();
        assert_eq!(parsed, StatusCode::LateWeather);
        assert!(serde_json::from_str::<StatusCode>("31").is_err());
    }
}
