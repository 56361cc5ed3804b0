//! API route handlers
//!
//! Request handling for the advisory endpoints: live telemetry, advisory
//! generation, paginated history and aggregate statistics. The engine
//! degrades internally, so the only client-visible failure on the advisory
//! path is a malformed request body.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::AdvisoryEngine;
use crate::telemetry::TelemetryAggregator;
use crate::types::{Advisory, AdvisoryRecord, AdvisoryStatistics, Conditions, SensorSnapshot};

/// Default page size for history queries.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<AdvisoryEngine>,
    pub telemetry: Arc<TelemetryAggregator>,
}

// ============================================================================
// Service banner & health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn home() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "ThermoSense advisory API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub advisories_stored: usize,
}

pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        advisories_stored: state.engine.history().count(),
    })
}

// ============================================================================
// Telemetry
// ============================================================================

/// GET /api/sensors — one fresh acquisition through the cascade.
pub async fn get_sensors(State(state): State<ApiState>) -> Json<SensorSnapshot> {
    Json(state.telemetry.acquire().await)
}

// ============================================================================
// Advisory
// ============================================================================

/// POST /api/advice — score + advice for client-supplied conditions.
///
/// Always 200 with a valid advisory; remote-advice failures resolve to the
/// deterministic fallback inside the engine.
pub async fn post_advice(
    State(state): State<ApiState>,
    Json(conditions): Json<Conditions>,
) -> Json<Advisory> {
    Json(state.engine.advise(&conditions).await)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<AdvisoryRecord>,
}

/// GET /api/advice/history?limit=N — newest first.
pub async fn get_history(
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.engine.history().recent(query.limit),
    })
}

/// GET /api/advice/statistics — aggregates over the full stored set.
pub async fn get_statistics(State(state): State<ApiState>) -> Json<AdvisoryStatistics> {
    Json(state.engine.history().statistics())
}
