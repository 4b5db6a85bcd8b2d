use serde::{Deserialize, Serialize};

use crate::{
    address::Address,
    flight::{FlightKey, OracleRequest, StatusCode},
    params::Wei,
};

/// Entries of the append-only protocol event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FlightEvent {
    /// A status request was issued; oracles owning `index` should answer.
    OracleRequested(OracleRequest),

    /// One oracle vote was accepted.
    OracleReported {
        request: OracleRequest,
        oracle: Address,
        status: StatusCode,
    },

    /// A request reached quorum. Emitted exactly once per request.
    FlightStatusSettled {
        request: OracleRequest,
        status: StatusCode,
        votes: usize,
    },

    /// Insured passengers of a flight were credited.
    InsureesCredited {
        flight_key: FlightKey,
        passengers: usize,
        total: Wei,
    },
}
