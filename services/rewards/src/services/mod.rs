//! Orchestration layer: composes repositories into the two core flows
//! (promocode redemption and the reward wheel).

pub mod cooldown;
pub mod redemption;
pub mod selector;
pub mod wheel;

#[cfg(test)]
pub mod testing;

pub use cooldown::{CooldownStatus, CooldownTracker};
pub use redemption::RedemptionService;
pub use selector::PrizeSelector;
pub use wheel::WheelService;
