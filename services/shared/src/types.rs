/// Type-safe wrappers for domain primitives
///
/// These types prevent common errors by enforcing validation at construction time
/// and providing checked arithmetic operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Credit amount out of range: {amount} minor units (min: {min}, max: {max})")]
    CreditAmountOutOfRange { amount: i64, min: i64, max: i64 },

    #[error("Credit amount overflow in operation")]
    CreditAmountOverflow,

    #[error("Usage cap out of range: {0} (must be >= 1)")]
    UsageCapOutOfRange(i64),
}

/// Type-safe reward amount in fixed-point minor units (kopecks)
///
/// Balances are adjusted by many small credits over a user's lifetime;
/// keeping the unit integral avoids floating-point rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreditAmount(i64);

impl CreditAmount {
    /// Create a new CreditAmount with validation
    pub fn new(minor: i64) -> Result<Self, ValidationError> {
        if !(MIN_CREDIT_MINOR..=MAX_CREDIT_MINOR).contains(&minor) {
            return Err(ValidationError::CreditAmountOutOfRange {
                amount: minor,
                min: MIN_CREDIT_MINOR,
                max: MAX_CREDIT_MINOR,
            });
        }
        Ok(Self(minor))
    }

    /// Create without validation (for internal use)
    pub fn new_unchecked(minor: i64) -> Self {
        Self(minor)
    }

    /// Get the raw minor-unit value
    pub fn as_minor(&self) -> i64 {
        self.0
    }

    /// Checked addition
    pub fn checked_add(&self, other: CreditAmount) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self::new_unchecked)
            .ok_or(ValidationError::CreditAmountOverflow)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, factor: i64) -> Result<Self, ValidationError> {
        self.0
            .checked_mul(factor)
            .map(Self::new_unchecked)
            .ok_or(ValidationError::CreditAmountOverflow)
    }

    /// Convert to rubles (as f64, display only)
    pub fn to_rubles(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_RUBLE as f64
    }

    /// Create from a whole-ruble amount
    pub fn from_rubles(rubles: i64) -> Result<Self, ValidationError> {
        rubles
            .checked_mul(MINOR_UNITS_PER_RUBLE)
            .ok_or(ValidationError::CreditAmountOverflow)
            .and_then(Self::new)
    }
}

impl TryFrom<i64> for CreditAmount {
    type Error = ValidationError;

    fn try_from(minor: i64) -> Result<Self, Self::Error> {
        Self::new(minor)
    }
}

impl From<CreditAmount> for i64 {
    fn from(amount: CreditAmount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for CreditAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}₽", self.0 / 100, (self.0 % 100).abs())
    }
}

/// Validated promocode usage cap (must be at least one use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCap(i64);

impl UsageCap {
    pub fn new(cap: i64) -> Result<Self, ValidationError> {
        if cap < 1 {
            return Err(ValidationError::UsageCapOutOfRange(cap));
        }
        Ok(Self(cap))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Default for UsageCap {
    fn default() -> Self {
        Self(DEFAULT_PROMO_MAX_USES)
    }
}

impl TryFrom<i64> for UsageCap {
    type Error = ValidationError;

    fn try_from(cap: i64) -> Result<Self, Self::Error> {
        Self::new(cap)
    }
}
