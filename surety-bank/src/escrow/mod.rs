pub mod engine;
pub mod payout;
