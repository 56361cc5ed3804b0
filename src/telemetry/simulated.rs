//! Simulated telemetry provider.
//!
//! Terminal stage of every cascade: generates synthetic readings within
//! deterministic bounds so the aggregator always has something to return.
//! Readings are tagged `simulated` so consumers never mistake them for
//! hardware data.

use super::{TelemetryError, TelemetrySource};
use crate::types::{BatteryReading, SourceKind, SystemLoadReading, TemperatureReading};
use async_trait::async_trait;
use rand::Rng;

/// Infallible synthetic telemetry generator.
pub struct SimulatedSource;

/// Synthetic battery: level in [70, 95], random charging flag.
pub fn battery() -> BatteryReading {
    let mut rng = rand::thread_rng();
    BatteryReading {
        level: rng.gen_range(70..=95),
        status: "Unknown".to_string(),
        charging: rng.gen_bool(0.5),
        voltage: None,
        source: SourceKind::Simulated,
    }
}

/// Synthetic temperatures around a 35 °C base, battery and system scaled
/// down from it the same way real gaps are derived.
pub fn temperatures() -> TemperatureReading {
    let mut rng = rand::thread_rng();
    let base = 35.0 + rng.gen_range(-5.0..10.0);
    TemperatureReading {
        cpu: Some(base),
        battery: Some(base * 0.8),
        system: Some(base * 0.7),
    }
}

/// Synthetic load: cpu in [15, 45] %, 8 GiB total memory, used in [3000, 6000] MB.
pub fn system_load() -> SystemLoadReading {
    let mut rng = rand::thread_rng();
    let total = 8192;
    let used = rng.gen_range(3000..=6000);
    SystemLoadReading {
        cpu_usage_pct: f64::from(rng.gen_range(15_u8..=45)),
        memory_total_mb: total,
        memory_used_mb: used,
        memory_free_mb: total - used,
        source: SourceKind::Simulated,
    }
}

#[async_trait]
impl TelemetrySource for SimulatedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Simulated
    }

    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
        Ok(battery())
    }

    async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
        Ok(temperatures())
    }

    async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError> {
        Ok(system_load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_bounds() {
        for _ in 0..100 {
            let reading = battery();
            assert!((70..=95).contains(&reading.level));
            assert_eq!(reading.status, "Unknown");
            assert_eq!(reading.source, SourceKind::Simulated);
        }
    }

    #[test]
    fn test_temperature_bounds() {
        for _ in 0..100 {
            let reading = temperatures();
            let cpu = reading.cpu.unwrap();
            assert!((30.0..45.0).contains(&cpu));
            assert!((reading.battery.unwrap() - cpu * 0.8).abs() < 1e-9);
            assert!((reading.system.unwrap() - cpu * 0.7).abs() < 1e-9);
        }
    }

    #[test]
    fn test_load_bounds() {
        for _ in 0..100 {
            let load = system_load();
            assert!((15.0..=45.0).contains(&load.cpu_usage_pct));
            assert_eq!(load.memory_total_mb, 8192);
            assert!((3000..=6000).contains(&load.memory_used_mb));
            assert_eq!(load.memory_free_mb, 8192 - load.memory_used_mb);
        }
    }
}
