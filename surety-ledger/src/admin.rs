use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use surety_common::{Address, Result, SuretyError};
use tracing::{info, warn};

/// Boolean guards every mutating entry point consults first.
pub trait AdminGate {
    fn is_operational(&self) -> bool;
    fn is_authorized(&self, caller: &Address) -> bool;

    fn require_operational(&self) -> Result<()> {
        if self.is_operational() {
            Ok(())
        } else {
            Err(SuretyError::NotOperational)
        }
    }

    /// Operational state first, then the caller.
    fn require_authorized(&self, caller: &Address) -> Result<()> {
        self.require_operational()?;
        if self.is_authorized(caller) {
            Ok(())
        } else {
            Err(SuretyError::NotAuthorizedCaller(*caller))
        }
    }
}

/// Contract owner, pause switch and the set of principals allowed to call
/// into escrow and airline bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Administrator {
    owner: Address,
    operational: bool,
    authorized: HashSet<Address>,
}

impl Administrator {
    /// The deploying account becomes the owner. Starts operational.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            operational: true,
            authorized: HashSet::new(),
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(SuretyError::NotAuthorizedCaller(*caller))
        }
    }

    /// Owner only. Allowed while paused so the system can be resumed.
    pub fn set_operational_status(&mut self, caller: &Address, mode: bool) -> Result<()> {
        self.require_owner(caller)?;
        if self.operational != mode {
            warn!("⏯️ Operational status changed: {} -> {}", self.operational, mode);
        }
        self.operational = mode;
        Ok(())
    }

    pub fn authorize(&mut self, caller: &Address, principal: Address) -> Result<()> {
        self.require_owner(caller)?;
        self.require_operational()?;
        self.authorized.insert(principal);
        info!("🔑 Authorized caller: {}", principal);
        Ok(())
    }

    pub fn deauthorize(&mut self, caller: &Address, principal: Address) -> Result<()> {
        self.require_owner(caller)?;
        self.require_operational()?;
        self.authorized.remove(&principal);
        info!("🔒 Deauthorized caller: {}", principal);
        Ok(())
    }
}

impl AdminGate for Administrator {
    fn is_operational(&self) -> bool {
        self.operational
    }

    fn is_authorized(&self, caller: &Address) -> bool {
        self.authorized.contains(caller)
    }
}
