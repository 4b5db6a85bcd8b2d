//! Shared types for the FlightSurety workspace.
//!
//! Everything the ledger, escrow, and consensus crates exchange lives here:
//! account addresses, flight keys, status codes, protocol events, the fixed
//! protocol parameters and the common error type.

pub mod address;
pub mod crypto;
pub mod env;
pub mod error;
pub mod flight;
pub mod params;

pub use address::Address;
pub use env::events::FlightEvent;
pub use error::{Result, SuretyError};
pub use flight::{FlightKey, OracleRequest, StatusCode};
pub use params::Wei;
