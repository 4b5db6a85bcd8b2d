use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surety_common::{Address, StatusCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyState {
    Open,
    Settled(StatusCode),
}

/// Votes collected for one request, grouped by proposed status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteTally {
    requester: Address,
    // StatusCode -> voters, in arrival order
    responses: BTreeMap<StatusCode, Vec<Address>>,
    state: TallyState,
}

impl VoteTally {
    pub fn new(requester: Address) -> Self {
        Self {
            requester,
            responses: BTreeMap::new(),
            state: TallyState::Open,
        }
    }

    pub fn requester(&self) -> &Address {
        &self.requester
    }

    pub fn state(&self) -> TallyState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == TallyState::Open
    }

    pub fn has_voted(&self, oracle: &Address, status: StatusCode) -> bool {
        self.responses
            .get(&status)
            .map_or(false, |voters| voters.contains(oracle))
    }

    /// Records the vote and returns how many distinct oracles now back
    /// `status`. Repeating a vote changes nothing.
    pub fn record(&mut self, oracle: Address, status: StatusCode) -> usize {
        let voters = self.responses.entry(status).or_default();
        if !voters.contains(&oracle) {
            voters.push(oracle);
        }
        voters.len()
    }

    pub fn count(&self, status: StatusCode) -> usize {
        self.responses.get(&status).map_or(0, Vec::len)
    }

    pub fn voters(&self, status: StatusCode) -> &[Address] {
        self.responses.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all(&self) -> &BTreeMap<StatusCode, Vec<Address>> {
        &self.responses
    }

    pub(crate) fn settle(&mut self, status: StatusCode) {
        self.state = TallyState::Settled(status);
    }
}
