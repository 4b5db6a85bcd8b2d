//! Passenger insurance escrow: premiums, payouts, withdrawals, and the
//! underwriting rules the application front applies before a purchase.

pub mod escrow;
pub mod underwriting;


pub use escrow::{engine::EscrowEngine, engine::Settlement, payout::PayoutPolicy};
pub use underwriting::{service::UnderwritingService, traits::UnderwritingRule, Purchase};
