//! Telemetry acquisition with cascading fallback.
//!
//! A [`TelemetrySource`] is one concrete provider (hwmon sysfs, ACPI
//! thermal zone, simulated generator). The [`TelemetryAggregator`] walks an
//! ordered ranking of sources per signal group and degrades to derived
//! estimates instead of failing — `acquire()` never errors.

mod acpi;
mod aggregator;
mod hwmon;
mod simulated;

pub use acpi::{decikelvin_to_celsius, AcpiThermalSource};
pub use aggregator::TelemetryAggregator;
pub use hwmon::HwmonSource;
pub use simulated::SimulatedSource;

use crate::types::{BatteryReading, SourceKind, SystemLoadReading, TemperatureReading};
use async_trait::async_trait;

/// Telemetry provider errors. These never escape the aggregator; every
/// failure triggers the next cascade stage.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

/// A single telemetry provider.
///
/// Each signal group fails independently: a provider may answer
/// temperatures but not battery (the ACPI zone does exactly that).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Provenance tag recorded on every reading this source produces.
    fn kind(&self) -> SourceKind;

    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError>;

    async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError>;

    async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError>;
}
