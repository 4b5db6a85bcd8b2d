use rand::{rngs::StdRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};
use surety_common::{params::SALT_WRAP, Address};

/// Source of the pseudo-random indices handed to oracles and requests.
pub trait IndexSource: Send {
    /// Next index in `0..space` drawn on behalf of `caller`.
    fn next_index(&mut self, caller: &Address, space: u8) -> u8;
}

/// Mixes fresh block-level entropy with the caller address and a salt that
/// advances on every draw.
///
/// The block entropy comes from a seedable CSPRNG, so a fixed seed reproduces
/// the exact index sequence.
#[derive(Debug, Clone)]
pub struct ChainEntropy {
    rng: StdRng,
    salt: u8,
}

impl ChainEntropy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            salt: 0,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            salt: 0,
        }
    }

    fn next_salt(&mut self) -> u8 {
        let salt = self.salt;
        self.salt = if salt + 1 >= SALT_WRAP { 0 } else { salt + 1 };
        salt
    }
}

impl IndexSource for ChainEntropy {
    fn next_index(&mut self, caller: &Address, space: u8) -> u8 {
        if space == 0 {
            return 0;
        }

        let mut block = [0u8; 32];
        self.rng.fill_bytes(&mut block);

        let mut hasher = Sha256::new();
        hasher.update(block);
        hasher.update(caller.as_bytes());
        hasher.update([self.next_salt()]);
        let digest = hasher.finalize();

        let mut tail = [0u8; 8];
        tail.copy_from_slice(&digest[24..]);
        (u64::from_be_bytes(tail) % u64::from(space)) as u8
    }
}
