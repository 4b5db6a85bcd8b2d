//! Keyed storage for airlines, passengers and oracles, plus the administrative
//! and airline collaborators the core consults before mutating anything.

pub mod admin;
pub mod airline;
pub mod journal;
pub mod passenger;
pub mod storage;
pub mod store;

pub use admin::{AdminGate, Administrator};
pub use airline::{Airline, AirlineDirectory};
pub use journal::EventJournal;
pub use passenger::Passenger;
pub use store::LedgerStore;
