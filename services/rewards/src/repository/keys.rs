//! Redis key generation functions
//!
//! Centralizes all Redis key patterns used for balances, promocodes and the
//! spin log. Promocode keys embed the uppercased code, which is what makes
//! lookups case-insensitive.

use uuid::Uuid;

/// Redis key prefix for user records (balance, ban flag)
const USER_KEY_PREFIX: &str = "user:";

/// Redis key for the set of all known user ids
const USER_INDEX: &str = "users:index";

/// Redis key prefix for promocodes
const PROMO_KEY_PREFIX: &str = "promo:";

/// Redis key for the set of all known promocode names
const PROMO_INDEX: &str = "promo:index";

/// Redis key prefix for spin audit records
const SPIN_KEY_PREFIX: &str = "spin:";

/// Redis key prefix for per-user spin indexes
const SPIN_USER_INDEX_PREFIX: &str = "spins:user:";

/// Redis key prefix for the per-user cooldown anchor (last qualifying spin)
const WHEEL_LAST_PREFIX: &str = "wheel:last:";

/// Generate Redis key for a user record
pub fn user_key(user_id: i64) -> String {
    format!("{}{}", USER_KEY_PREFIX, user_id)
}

/// Get Redis key for the user id set
pub fn user_index_key() -> &'static str {
    USER_INDEX
}

/// Generate Redis key for a promocode (case-insensitive via uppercasing)
pub fn promo_key(code: &str) -> String {
    format!("{}{}", PROMO_KEY_PREFIX, code.to_uppercase())
}

/// Generate Redis key for a promocode's redeemer set (the uniqueness guard)
pub fn promo_redeemers_key(code: &str) -> String {
    format!("{}{}:redeemers", PROMO_KEY_PREFIX, code.to_uppercase())
}

/// Get Redis key for the promocode name set
pub fn promo_index_key() -> &'static str {
    PROMO_INDEX
}

/// Generate Redis key for a spin record
pub fn spin_key(spin_id: Uuid) -> String {
    format!("{}{}", SPIN_KEY_PREFIX, spin_id)
}

/// Generate Redis key for a user's spin index
pub fn spin_user_index_key(user_id: i64) -> String {
    format!("{}{}", SPIN_USER_INDEX_PREFIX, user_id)
}

/// Generate Redis key for a user's cooldown anchor
pub fn wheel_last_key(user_id: i64) -> String {
    format!("{}{}", WHEEL_LAST_PREFIX, user_id)
}
