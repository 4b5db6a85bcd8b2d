use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SuretyError;

/// A 20-byte account address, written as `0x` followed by 40 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Fresh random address, used for simulated accounts.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 20];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether `address` parses as a 0x-prefixed 20-byte hex string.
    pub fn is_valid(address: &str) -> bool {
        Self::parse(address).is_ok()
    }

    fn parse(address: &str) -> Result<[u8; 20], SuretyError> {
        let digits = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .ok_or_else(|| SuretyError::InvalidAddress(format!("missing 0x prefix: {}", address)))?;

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| SuretyError::InvalidAddress(format!("{}: {}", address, e)))?;
        Ok(bytes)
    }
}

impl TryFrom<&str> for Address {
    type Error = SuretyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s).map(Address)
    }
}

impl TryFrom<String> for Address {
    type Error = SuretyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Address::try_from(s.as_str())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
