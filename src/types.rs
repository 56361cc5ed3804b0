//! Core data types for the ThermoSense advisory engine.
//!
//! Telemetry snapshots, normalized conditions, alert levels and the
//! advisory records persisted to history. All types are serde-serializable
//! and immutable once constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Telemetry
// ============================================================================

/// Which stage of the telemetry cascade produced a reading.
///
/// `Fallback` marks values derived from other readings (e.g. battery
/// temperature estimated from CPU temperature); `Simulated` marks random
/// synthetic data. Downstream consumers use this to distinguish real
/// hardware data from estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    HardwareMonitor,
    Acpi,
    Simulated,
    Fallback,
    Mixed,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HardwareMonitor => "hardware-monitor",
            Self::Acpi => "acpi",
            Self::Simulated => "simulated",
            Self::Fallback => "fallback",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery state as reported by one telemetry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Charge level in percent (0-100)
    pub level: u8,
    /// Human-readable charge status ("Charging", "Discharging", "Unknown", ...)
    pub status: String,
    pub charging: bool,
    /// Battery voltage in volts, when the platform exposes it
    pub voltage: Option<f64>,
    pub source: SourceKind,
}

/// Temperatures as reported by one telemetry source.
///
/// Fields stay optional while inside the cascade; the aggregator resolves
/// every gap before a snapshot leaves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub cpu: Option<f64>,
    pub battery: Option<f64>,
    pub system: Option<f64>,
}

impl TemperatureReading {
    pub fn is_complete(&self) -> bool {
        self.cpu.is_some() && self.battery.is_some() && self.system.is_some()
    }
}

/// Fully resolved temperature set. Every field populated, in °C.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTemperatures {
    pub cpu: f64,
    pub battery: f64,
    pub system: f64,
    pub source: SourceKind,
}

/// CPU load and memory usage as reported by one telemetry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLoadReading {
    /// CPU load in percent (0-100)
    pub cpu_usage_pct: f64,
    pub memory_total_mb: u64,
    pub memory_used_mb: u64,
    pub memory_free_mb: u64,
    pub source: SourceKind,
}

/// One complete telemetry acquisition.
///
/// Created fresh on every `acquire()` call and never mutated afterwards.
/// `source` is the common provenance of all three groups, or `Mixed` when
/// they came from different cascade stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub battery: BatteryReading,
    pub temperatures: ResolvedTemperatures,
    pub system: SystemLoadReading,
    pub source: SourceKind,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Conditions & advisories
// ============================================================================

/// Coarse device activity state used for scoring and advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Idle,
    Active,
    Charging,
    Discharging,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Charging => "charging",
            Self::Discharging => "discharging",
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_battery_level() -> u8 {
    75
}

/// Normalized input to scoring and advisory generation.
///
/// `battery_temp` and `ambient_temp` are always present; `cpu_temp` may be
/// absent (e.g. manual client input without a CPU sensor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    pub battery_temp: f64,
    pub ambient_temp: f64,
    pub device_state: DeviceState,
    #[serde(default = "default_battery_level")]
    pub battery_level: u8,
    #[serde(default)]
    pub cpu_temp: Option<f64>,
}

/// Ordered alert severity. Classification is monotonic in temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Safe,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generator variant produced the advice text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceOrigin {
    Remote,
    Fallback,
}

/// Combined advisory output for one set of conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// Bounded health-impact score in [0, 0.15]
    pub predicted_health_impact: f64,
    pub alert_level: AlertLevel,
    pub advice_text: String,
    pub recommended_action: Option<String>,
    pub advice_source: AdviceOrigin,
}

/// One history entry: the conditions, the advisory they produced, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub conditions: Conditions,
    pub advisory: Advisory,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate statistics over the full advisory history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryStatistics {
    pub total_advisories: usize,
    pub mean_impact: f64,
    pub max_impact: f64,
    pub safe_count: usize,
    pub warning_count: usize,
    pub danger_count: usize,
    pub most_recent_alert: Option<AlertLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_level_ordering() {
        assert!(AlertLevel::Safe < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Danger);
    }

    #[test]
    fn test_device_state_serde_lowercase() {
        let state: DeviceState = serde_json::from_str("\"charging\"").unwrap();
        assert_eq!(state, DeviceState::Charging);
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"charging\"");
    }

    #[test]
    fn test_unknown_device_state_rejected() {
        let result: Result<DeviceState, _> = serde_json::from_str("\"overclocked\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_conditions_defaults() {
        let conditions: Conditions =
            serde_json::from_str(r#"{"battery_temp": 32.0, "ambient_temp": 24.0, "device_state": "idle"}"#)
                .unwrap();
        assert_eq!(conditions.battery_level, 75);
        assert!(conditions.cpu_temp.is_none());
    }

    #[test]
    fn test_source_kind_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SourceKind::HardwareMonitor).unwrap(),
            "\"hardware-monitor\""
        );
        assert_eq!(SourceKind::Mixed.as_str(), "mixed");
    }
}
