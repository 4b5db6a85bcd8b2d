use thiserror::Error;

use crate::{address::Address, params::Wei};

/// Every way a FlightSurety operation can be rejected.
///
/// All variants except the ambient ones (`Config`, `Io`, `Serialization`) are
/// precondition failures: the operation that returned them changed nothing.
#[derive(Debug, Error)]
pub enum SuretyError {
    /// State-changing calls are paused by the administrator.
    #[error("Contract is currently not operational")]
    NotOperational,

    /// The caller is not an authorized principal for this call.
    #[error("Caller is not authorized: {0}")]
    NotAuthorizedCaller(Address),

    #[error("Oracle is not registered: {0}")]
    NotRegistered(Address),

    #[error("Oracle is already registered: {0}")]
    AlreadyRegistered(Address),

    /// The oracle voted with an index it was not assigned.
    #[error("Index {index} does not belong to oracle {oracle}")]
    IndexNotOwned { oracle: Address, index: u8 },

    /// No request was issued for this (index, airline, flight, timestamp).
    #[error("No oracle request for index {index}, flight {flight} of {airline} at {timestamp}")]
    NoSuchRequest {
        index: u8,
        airline: Address,
        flight: String,
        timestamp: u64,
    },

    #[error("Registration fee is {required} wei, got {paid} wei")]
    InsufficientFee { paid: Wei, required: Wei },

    #[error("Airline is not registered: {0}")]
    AirlineNotRegistered(Address),

    #[error("Airline has not been funded: {0}")]
    AirlineNotFunded(Address),

    #[error("Premium of {amount} wei exceeds the maximum of {max} wei")]
    PremiumTooHigh { amount: Wei, max: Wei },

    #[error("Unknown flight status code: {0}")]
    InvalidStatusCode(u8),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SuretyError>;
