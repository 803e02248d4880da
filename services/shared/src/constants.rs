//! Domain-wide constants shared across services

/// Fixed-point scale: balances and reward amounts are stored in kopecks.
pub const MINOR_UNITS_PER_RUBLE: i64 = 100;

/// Smallest credit a promocode or prize may carry (1 kopeck).
pub const MIN_CREDIT_MINOR: i64 = 1;

/// Largest single credit accepted from configuration (100 000 rubles).
pub const MAX_CREDIT_MINOR: i64 = 10_000_000;

/// Default wheel cooldown window between qualifying spins.
pub const DEFAULT_COOLDOWN_HOURS: i64 = 48;

/// Default usage cap when a promocode is created without one.
pub const DEFAULT_PROMO_MAX_USES: i64 = 1;
