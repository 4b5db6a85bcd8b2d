//! Quorum state machine over flight-status votes.
//!
//! Each request moves from `Open` to `Settled` at most once. Votes may arrive
//! in any order, from any subset of the oracles holding the request's index,
//! with no bound on latency; a request nobody answers simply stays open.

pub mod engine;
pub mod evaluator;
pub mod pool;
pub mod registry;
