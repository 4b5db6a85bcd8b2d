//! Fixed protocol parameters.

/// Amounts are denominated in wei.
pub type Wei = u128;

pub const ONE_ETHER: Wei = 1_000_000_000_000_000_000;

/// Fee an oracle pays to register.
pub const REGISTRATION_FEE: Wei = ONE_ETHER;

/// Matching votes needed before a status code settles a request.
pub const MIN_RESPONSES: usize = 3;

/// Payout multiplier applied to an insured amount, as numerator / denominator.
pub const PAYOUT_NUMERATOR: Wei = 3;
pub const PAYOUT_DENOMINATOR: Wei = 2;

/// Indices are drawn from `0..INDEX_SPACE`.
pub const INDEX_SPACE: u8 = 10;

pub const INDICES_PER_ORACLE: usize = 3;

/// Largest premium the application front accepts for one flight.
pub const MAX_PREMIUM: Wei = ONE_ETHER;

/// The entropy salt wraps back to zero once it reaches this value.
pub const SALT_WRAP: u8 = 250;

/// Minimum an airline must put up before its flights can be insured.
pub const AIRLINE_FUNDING: Wei = 10 * ONE_ETHER;
