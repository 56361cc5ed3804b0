//! ACPI thermal-zone telemetry provider.
//!
//! Secondary temperature source used when no hardware-monitor sensors are
//! available. Reads a single zone's raw `_TMP` value, which ACPI reports in
//! tenths of Kelvin, and assigns the converted reading to the "system"
//! category only. Supplies no battery or load data.

use super::{TelemetryError, TelemetrySource};
use crate::types::{BatteryReading, SourceKind, SystemLoadReading, TemperatureReading};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// Convert a raw ACPI `_TMP` reading (tenths of Kelvin) to °C.
///
/// Example: raw 3000 → 26.85 °C.
pub fn decikelvin_to_celsius(raw: i64) -> f64 {
    raw as f64 / 10.0 - 273.15
}

/// Single-zone ACPI thermal provider.
pub struct AcpiThermalSource {
    zone_path: PathBuf,
}

impl AcpiThermalSource {
    pub fn new(zone_path: impl Into<PathBuf>) -> Self {
        Self {
            zone_path: zone_path.into(),
        }
    }
}

#[async_trait]
impl TelemetrySource for AcpiThermalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Acpi
    }

    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
        Err(TelemetryError::Unavailable(
            "ACPI thermal zone carries no battery data".to_string(),
        ))
    }

    async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
        let raw = fs::read_to_string(&self.zone_path)?
            .trim()
            .parse::<i64>()
            .map_err(|e| {
                TelemetryError::Parse(format!(
                    "thermal zone {}: {e}",
                    self.zone_path.display()
                ))
            })?;

        Ok(TemperatureReading {
            system: Some(decikelvin_to_celsius(raw)),
            ..TemperatureReading::default()
        })
    }

    async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError> {
        Err(TelemetryError::Unavailable(
            "ACPI thermal zone carries no load data".to_string(),
        ))
    }
}
