use serde::{Deserialize, Serialize};
use surety_common::{params::MIN_RESPONSES, Address, StatusCode};

use super::registry::VoteTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    pub min_responses: usize,
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            min_responses: MIN_RESPONSES,
        }
    }
}

impl QuorumPolicy {
    pub fn new(min_responses: usize) -> Self {
        Self { min_responses }
    }

    pub fn is_met(&self, votes: usize) -> bool {
        votes >= self.min_responses
    }

    /// Whether a vote by `oracle` for `status` would settle `tally`.
    pub fn would_settle(&self, tally: &VoteTally, oracle: &Address, status: StatusCode) -> bool {
        if !tally.is_open() {
            return false;
        }
        let after = tally.count(status) + usize::from(!tally.has_voted(oracle, status));
        self.is_met(after)
    }
}
