use serde::{Deserialize, Serialize};
use surety_common::{
    params::{INDEX_SPACE, INDICES_PER_ORACLE, REGISTRATION_FEE},
    Address, Result, SuretyError, Wei,
};
use surety_ledger::{AdminGate, LedgerStore};
use tracing::info;

use super::entropy::IndexSource;

/// Registration rules for oracles. Assignments themselves live in the
/// [`LedgerStore`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OracleRegistry {
    pub fee: Wei,
    pub index_space: u8,
}

impl Default for OracleRegistry {
    fn default() -> Self {
        Self {
            fee: REGISTRATION_FEE,
            index_space: INDEX_SPACE,
        }
    }
}

impl OracleRegistry {
    pub fn new(fee: Wei, index_space: u8) -> Self {
        Self { fee, index_space }
    }

    /// Registers `oracle` and assigns its indices for good. `caller` is the
    /// principal forwarding the registration and must be authorized.
    ///
    /// A second registration of the same address is rejected rather than
    /// answered with the existing assignment.
    pub fn register(
        &self,
        store: &mut LedgerStore,
        gate: &dyn AdminGate,
        caller: &Address,
        oracle: Address,
        fee_paid: Wei,
        entropy: &mut dyn IndexSource,
    ) -> Result<[u8; INDICES_PER_ORACLE]> {
        gate.require_authorized(caller)?;

        if fee_paid < self.fee {
            return Err(SuretyError::InsufficientFee {
                paid: fee_paid,
                required: self.fee,
            });
        }
        if store.oracle_indexes(&oracle).is_some() {
            return Err(SuretyError::AlreadyRegistered(oracle));
        }

        let indexes = self.generate_indexes(&oracle, entropy);
        store.set_oracle_indexes(oracle, indexes);

        info!("🔮 Oracle {} registered with indexes {:?}", oracle, indexes);
        Ok(indexes)
    }

    /// Draws each index separately; repeats are allowed.
    fn generate_indexes(&self, oracle: &Address, entropy: &mut dyn IndexSource) -> [u8; INDICES_PER_ORACLE] {
        let mut indexes = [0u8; INDICES_PER_ORACLE];
        for slot in indexes.iter_mut() {
            *slot = entropy.next_index(oracle, self.index_space);
        }
        indexes
    }

    pub fn indexes_of(&self, store: &LedgerStore, oracle: &Address) -> Result<[u8; INDICES_PER_ORACLE]> {
        store
            .oracle_indexes(oracle)
            .ok_or(SuretyError::NotRegistered(*oracle))
    }

    pub fn owns_index(&self, store: &LedgerStore, oracle: &Address, index: u8) -> Result<bool> {
        Ok(self.indexes_of(store, oracle)?.contains(&index))
    }
}
