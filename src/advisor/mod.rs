//! Advisory generation.
//!
//! Two [`AdviceGenerator`] variants produce the human-readable advice text:
//! a remote reasoning service ([`RemoteAdvisor`]) and a deterministic local
//! fallback ([`FallbackAdvisor`]) used whenever the remote call fails or no
//! remote is configured.
//!
//! Alert level and recommended action are never derived from generated
//! text. [`classify_alert`] applies fixed temperature thresholds and is the
//! single authority for both, regardless of which variant answered.

mod fallback;
mod remote;

pub use fallback::FallbackAdvisor;
pub use remote::RemoteAdvisor;

use crate::types::{AdviceOrigin, AlertLevel, Conditions};
use async_trait::async_trait;

/// Battery temperature (°C) above which conditions are dangerous.
pub const DANGER_BATTERY_TEMP_C: f64 = 45.0;
/// CPU temperature (°C) above which conditions are dangerous.
pub const DANGER_CPU_TEMP_C: f64 = 85.0;
/// Battery temperature (°C) above which conditions warrant a warning.
pub const WARNING_BATTERY_TEMP_C: f64 = 38.0;
/// CPU temperature (°C) above which conditions warrant a warning.
pub const WARNING_CPU_TEMP_C: f64 = 70.0;

const DANGER_ACTION: &str = "Immediate cooling required - shut down intensive tasks";
const WARNING_ACTION: &str = "Monitor temperature and reduce workload";

/// Advice generation errors. Any of these sends the engine to the fallback
/// variant; none of them fails the advisory request.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("reasoning service returned status {0}")]
    ServerStatus(reqwest::StatusCode),
    #[error("malformed reasoning-service response: {0}")]
    MalformedResponse(String),
}

/// Advice text produced by one generator variant.
#[derive(Debug, Clone)]
pub struct GeneratedAdvice {
    pub text: String,
    pub origin: AdviceOrigin,
    /// Fixed impact estimate carried by the fallback variant. The engine's
    /// advisory impact always comes from the scorer path; this value is
    /// retained for cross-checking only.
    pub impact_estimate: Option<f64>,
}

/// Capability behind which the external reasoning service sits.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn generate_advice(&self, conditions: &Conditions)
        -> Result<GeneratedAdvice, AdvisorError>;
}

/// Classify conditions into an alert level and recommended action using
/// fixed temperature thresholds. Monotonic in both temperatures.
pub fn classify_alert(conditions: &Conditions) -> (AlertLevel, Option<String>) {
    let cpu_temp = conditions.cpu_temp;
    let cpu_above = |threshold: f64| cpu_temp.is_some_and(|t| t > threshold);

    if conditions.battery_temp > DANGER_BATTERY_TEMP_C || cpu_above(DANGER_CPU_TEMP_C) {
        (AlertLevel::Danger, Some(DANGER_ACTION.to_string()))
    } else if conditions.battery_temp > WARNING_BATTERY_TEMP_C || cpu_above(WARNING_CPU_TEMP_C) {
        (AlertLevel::Warning, Some(WARNING_ACTION.to_string()))
    } else {
        (AlertLevel::Safe, None)
    }
}
