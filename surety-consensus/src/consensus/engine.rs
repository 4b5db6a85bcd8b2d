use std::collections::HashMap;

use surety_bank::{EscrowEngine, Settlement};
use surety_common::{Address, FlightEvent, FlightKey, OracleRequest, Result, StatusCode, SuretyError};
use surety_ledger::{AdminGate, AirlineDirectory, EventJournal, LedgerStore};
use tracing::{info, warn};

use super::{
    evaluator::QuorumPolicy,
    pool::RequestPool,
    registry::{TallyState, VoteTally},
};
use crate::oracle::{entropy::IndexSource, registry::OracleRegistry};

/// What an accepted vote did to its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Counted; no status has quorum yet.
    Pending { votes: usize },
    /// This vote settled the request. `settlement` is present when the status
    /// was an airline-caused delay and insurees were credited.
    Settled {
        status: StatusCode,
        votes: usize,
        settlement: Option<Settlement>,
    },
    /// Counted after the request had already settled; changes nothing.
    Inert { settled: StatusCode },
}

/// Issues status requests, tallies oracle votes and settles each request
/// exactly once.
///
/// The coordinator calls escrow as `address`, which must be authorized on the
/// administrative gate for payouts to go through.
#[derive(Debug, Clone)]
pub struct ConsensusCoordinator {
    address: Address,
    registry: OracleRegistry,
    policy: QuorumPolicy,
    escrow: EscrowEngine,
    pool: RequestPool,
    journal: EventJournal,
    statuses: HashMap<FlightKey, StatusCode>,
}

impl ConsensusCoordinator {
    pub fn new(address: Address, registry: OracleRegistry, policy: QuorumPolicy, escrow: EscrowEngine) -> Self {
        Self {
            address,
            registry,
            policy,
            escrow,
            pool: RequestPool::new(),
            journal: EventJournal::new(),
            statuses: HashMap::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &QuorumPolicy {
        &self.policy
    }

    pub fn escrow(&self) -> &EscrowEngine {
        &self.escrow
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn tally(&self, request: &OracleRequest) -> Option<&VoteTally> {
        self.pool.get(request)
    }

    pub fn open_requests(&self) -> Vec<OracleRequest> {
        self.pool.open_requests().cloned().collect()
    }

    /// Latest settled status for the flight, if any request for it settled.
    pub fn flight_status(&self, airline: &Address, flight: &str, timestamp: u64) -> Option<StatusCode> {
        self.statuses.get(&FlightKey::new(airline, flight, timestamp)).copied()
    }

    /// Opens a request under a pseudo-random index and logs the event oracles
    /// listen for.
    pub fn request_status(
        &mut self,
        gate: &dyn AdminGate,
        requester: &Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        entropy: &mut dyn IndexSource,
    ) -> Result<OracleRequest> {
        gate.require_authorized(&self.address)?;

        let index = entropy.next_index(requester, self.registry.index_space);
        let request = OracleRequest::new(index, airline, flight, timestamp);

        if self.pool.open(request.clone(), *requester) {
            info!(target: "consensus", "EVENT:REQUEST index={} airline={} flight={} timestamp={} requester={}",
                index, airline, flight, timestamp, requester);
        }
        self.journal.append(FlightEvent::OracleRequested(request.clone()));

        Ok(request)
    }

    /// Counts one oracle vote.
    ///
    /// Every check runs before the tally is touched, so a rejected vote
    /// leaves no trace.
    ///
    /// The first request to settle fixes the flight's status. A later request
    /// for the same flight still settles its own tally, but pays out only if
    /// it agrees with that status.
    pub fn submit_vote(
        &mut self,
        store: &mut LedgerStore,
        gate: &dyn AdminGate,
        oracle: &Address,
        request: &OracleRequest,
        status: StatusCode,
    ) -> Result<VoteOutcome> {
        gate.require_authorized(&self.address)?;

        if !self.registry.owns_index(store, oracle, request.index)? {
            return Err(SuretyError::IndexNotOwned {
                oracle: *oracle,
                index: request.index,
            });
        }

        let tally = self.pool.get_mut(request).ok_or_else(|| SuretyError::NoSuchRequest {
            index: request.index,
            airline: request.airline,
            flight: request.flight.clone(),
            timestamp: request.timestamp,
        })?;

        let key = request.flight_key();
        let settles = self.policy.would_settle(tally, oracle, status);
        let authoritative = self.statuses.get(&key).copied().unwrap_or(status);
        let credits = settles
            && authoritative == status
            && status.is_airline_fault()
            && store.is_registered(&request.airline);

        let votes = tally.record(*oracle, status);
        let prior = tally.state();
        if settles {
            tally.settle(status);
        }

        self.journal.append(FlightEvent::OracleReported {
            request: request.clone(),
            oracle: *oracle,
            status,
        });
        info!(target: "consensus", "EVENT:VOTE index={} flight={} oracle={} status={} votes={}",
            request.index, request.flight, oracle, status.code(), votes);

        if !settles {
            return Ok(match prior {
                TallyState::Settled(settled) => VoteOutcome::Inert { settled },
                TallyState::Open => VoteOutcome::Pending { votes },
            });
        }

        self.statuses.entry(key).or_insert(status);
        self.journal.append(FlightEvent::FlightStatusSettled {
            request: request.clone(),
            status,
            votes,
        });
        info!(target: "consensus", "EVENT:SETTLED flight={} key={} status={} votes={}",
            request.flight, key, status.code(), votes);

        let settlement = if credits {
            let settlement = self.escrow.credit_insurees(store, gate, &self.address, key)?;
            if !settlement.credited.is_empty() {
                self.journal.append(FlightEvent::InsureesCredited {
                    flight_key: key,
                    passengers: settlement.credited.len(),
                    total: settlement.total,
                });
                info!(target: "consensus", "EVENT:CREDIT key={} passengers={} total={}",
                    key, settlement.credited.len(), settlement.total);
            }
            Some(settlement)
        } else {
            if authoritative != status {
                warn!("{} already settled as {}; later {} not applied", request.flight, authoritative, status);
            } else if status.is_airline_fault() {
                warn!("Airline {} is not registered; delay of {} not paid out", request.airline, request.flight);
            }
            None
        };

        Ok(VoteOutcome::Settled {
            status,
            votes,
            settlement,
        })
    }
}
