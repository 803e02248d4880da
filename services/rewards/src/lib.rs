// Library interface for the rewards backend - exposes modules for testing

pub mod config;
pub mod domain;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
        // Reward wheel
        .route("/api/wheel/check", get(handlers::wheel::check_cooldown))
        .route("/api/wheel/spin", post(handlers::wheel::spin))
        // Promocodes
        .route("/api/promo/redeem", post(handlers::promo::redeem))
        // Admin promocode management
        .route("/api/admin/promocodes", post(handlers::admin::create_promocode))
        .route("/api/admin/promocodes", get(handlers::admin::list_promocodes))
        .route("/api/admin/promocodes/:code", delete(handlers::admin::delete_promocode))
        .route("/api/admin/stats", get(handlers::admin::stats))
        .route("/api/admin/users/:user_id/ban", post(handlers::admin::set_banned))
        // Metrics
        .route("/metrics", get(handlers::metrics::metrics_handler))
        // State
        .with_state(state)
        // Middleware
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
