//! Oracle registration and the flight-status quorum protocol.
//!
//! Oracles register once and receive three indices. Every status request is
//! tagged with one index; only oracles holding it may answer. The first status
//! code to collect [`MIN_RESPONSES`](surety_common::params::MIN_RESPONSES)
//! distinct votes settles the request, and an airline-caused delay credits the
//! flight's insurees through the escrow engine in the same step.

pub mod consensus;
pub mod oracle;

pub use consensus::engine::{ConsensusCoordinator, VoteOutcome};
pub use consensus::evaluator::QuorumPolicy;
pub use consensus::registry::{TallyState, VoteTally};
pub use oracle::entropy::{ChainEntropy, IndexSource};
pub use oracle::registry::OracleRegistry;
