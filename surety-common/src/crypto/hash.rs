use sha2::{Digest, Sha256};

use crate::address::Address;

/// Hashes the packed concatenation of airline, flight designator and
/// departure timestamp.
///
/// The timestamp is packed as a 32-byte big-endian word so the preimage has
/// the same shape whatever width the caller's clock uses.
pub fn flight_key_hash(airline: &Address, flight: &str, timestamp: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&timestamp.to_be_bytes());

    let mut hasher = Sha256::new();
    hasher.update(airline.as_bytes());
    hasher.update(flight.as_bytes());
    hasher.update(word);
    hasher.finalize().into()
}
