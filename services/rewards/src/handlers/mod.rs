pub mod admin;
pub mod health;
pub mod metrics;
pub mod promo;
pub mod wheel;
