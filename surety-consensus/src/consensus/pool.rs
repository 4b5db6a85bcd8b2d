use std::collections::HashMap;

use surety_common::{Address, OracleRequest};
use tracing::debug;

use super::registry::VoteTally;

/// Every request ever issued, keyed by (index, airline, flight, timestamp).
/// Nothing is evicted: a request without quorum waits indefinitely.
#[derive(Debug, Default, Clone)]
pub struct RequestPool {
    tallies: HashMap<OracleRequest, VoteTally>,
}

impl RequestPool {
    pub fn new() -> Self {
        Self {
            tallies: HashMap::new(),
        }
    }

    /// Opens a tally for `request`. Returns false and keeps the existing
    /// tally, votes included, when the same request was issued before.
    pub fn open(&mut self, request: OracleRequest, requester: Address) -> bool {
        if self.tallies.contains_key(&request) {
            debug!("request {} already tracked", request);
            return false;
        }
        self.tallies.insert(request, VoteTally::new(requester));
        true
    }

    pub fn get(&self, request: &OracleRequest) -> Option<&VoteTally> {
        self.tallies.get(request)
    }

    pub fn get_mut(&mut self, request: &OracleRequest) -> Option<&mut VoteTally> {
        self.tallies.get_mut(request)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Requests still waiting for quorum.
    pub fn open_requests(&self) -> impl Iterator<Item = &OracleRequest> {
        self.tallies
            .iter()
            .filter(|(_, tally)| tally.is_open())
            .map(|(request, _)| request)
    }
}
