//! Redis-backed persistence for the reward ledger
//!
//! Each aggregate (user balance, promocode, spin log) gets its own store
//! behind a trait. Every check-then-write that races across requests goes
//! through a Lua script so the check and the write land as one unit.

pub mod keys;
pub mod ledger;
pub mod lua_scripts;
pub mod promocodes;
pub mod spins;
pub mod users;

pub use keys::*;
pub use ledger::{LedgerStore, RedisLedgerStore};
pub use lua_scripts::*;
pub use promocodes::{PromocodeRegistry, RedisPromocodeRegistry};
pub use spins::{RedisSpinLog, SpinCommit, SpinLog};
pub use users::{RedisUserDirectory, UserDirectory};
