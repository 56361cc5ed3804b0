//! ThermoSense: Thermal & Battery Advisory Engine
//!
//! Monitors device thermal and battery state and produces advisories:
//! a deterministic alert level, a predicted battery-health impact score
//! and a human-readable recommendation.
//!
//! ## Architecture
//!
//! - **Telemetry**: ranked cascade of sources (hwmon sysfs → ACPI thermal
//!   zone → simulated) that always yields a complete snapshot
//! - **Scoring**: deterministic rule scorer cross-checked against an
//!   offline-fitted linear model, both bounded to [0, 0.15]
//! - **Advisor**: remote reasoning service for the advice text with a total
//!   deterministic fallback; alert level always from fixed thresholds
//! - **History**: append-only sled log with aggregate statistics

pub mod advisor;
pub mod api;
pub mod config;
pub mod engine;
pub mod history;
pub mod scoring;
pub mod telemetry;
pub mod types;

// Re-export the engine entry points
pub use engine::AdvisoryEngine;
pub use history::{AdvisoryHistory, HistoryError};
pub use telemetry::{TelemetryAggregator, TelemetryError, TelemetrySource};

// Re-export commonly used types
pub use types::{
    AdviceOrigin, Advisory, AdvisoryRecord, AdvisoryStatistics, AlertLevel, Conditions,
    DeviceState, SensorSnapshot, SourceKind,
};

// Re-export scorers
pub use scoring::{LinearModel, ModelError, RuleScorer, Scorer, MAX_HEALTH_IMPACT};
