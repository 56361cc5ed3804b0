//! API route definitions
//!
//! Endpoints for the ThermoSense advisory service:
//! - /api/sensors - live telemetry snapshot
//! - /api/advice - advisory for posted conditions
//! - /api/advice/history - paginated advisory history
//! - /api/advice/statistics - aggregate statistics

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Create all /api routes.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/sensors", get(handlers::get_sensors))
        .route("/advice", post(handlers::post_advice))
        .route("/advice/history", get(handlers::get_history))
        .route("/advice/statistics", get(handlers::get_statistics))
        .with_state(state)
}

/// Root-level banner and health endpoints.
pub fn root_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
