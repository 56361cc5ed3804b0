//! Ranked-cascade telemetry aggregation.
//!
//! Each signal group (battery, temperatures, system load) walks the source
//! ranking independently, so a missing hardware-monitor integration never
//! blocks battery or load acquisition. Exhausted cascades terminate in
//! synthetic values; `acquire()` cannot fail.

use super::{simulated, TelemetrySource};
use crate::types::{
    BatteryReading, ResolvedTemperatures, SensorSnapshot, SourceKind, SystemLoadReading,
    TemperatureReading,
};
use chrono::Utc;
use std::sync::Arc;

/// Default CPU temperature (°C) when no stage reported one.
const DEFAULT_CPU_TEMP: f64 = 45.0;
/// Battery runs cooler than the CPU; used to derive a missing reading.
const BATTERY_FROM_CPU_RATIO: f64 = 0.8;
/// System/chassis scales further down from CPU.
const SYSTEM_FROM_CPU_RATIO: f64 = 0.7;

/// Orchestrates an ordered list of telemetry sources.
pub struct TelemetryAggregator {
    sources: Vec<Arc<dyn TelemetrySource>>,
}

impl TelemetryAggregator {
    pub fn new(sources: Vec<Arc<dyn TelemetrySource>>) -> Self {
        Self { sources }
    }

    /// Ranking that only ever produces synthetic data (`--simulate`, tests).
    pub fn simulated_only() -> Self {
        Self::new(vec![Arc::new(simulated::SimulatedSource)])
    }

    /// Acquire one fully populated snapshot. Never fails: every provider
    /// error is logged and triggers the next cascade stage, and any gap
    /// left after the cascade is filled with a derived estimate.
    pub async fn acquire(&self) -> SensorSnapshot {
        let battery = self.acquire_battery().await;
        let temperatures = self.acquire_temperatures().await;
        let system = self.acquire_system_load().await;

        let source = if battery.source == temperatures.source && battery.source == system.source {
            battery.source
        } else {
            SourceKind::Mixed
        };

        SensorSnapshot {
            battery,
            temperatures,
            system,
            source,
            timestamp: Utc::now(),
        }
    }

    async fn acquire_battery(&self) -> BatteryReading {
        for source in &self.sources {
            match source.read_battery().await {
                Ok(reading) => return reading,
                Err(e) => {
                    tracing::debug!(source = %source.kind(), error = %e, "battery read failed, trying next source");
                }
            }
        }
        tracing::warn!("all battery sources exhausted, using simulated reading");
        simulated::battery()
    }

    /// Walk the ranking merging per-category first-match-wins, then derive
    /// whatever is still missing.
    async fn acquire_temperatures(&self) -> ResolvedTemperatures {
        let mut merged = TemperatureReading::default();
        let mut contributor: Option<SourceKind> = None;

        for source in &self.sources {
            match source.read_temperatures().await {
                Ok(reading) => {
                    let filled = merge_missing(&mut merged, &reading);
                    if filled && contributor.is_none() {
                        contributor = Some(source.kind());
                    }
                    if merged.is_complete() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(source = %source.kind(), error = %e, "temperature read failed, trying next source");
                }
            }
        }

        let cpu = merged.cpu.unwrap_or(DEFAULT_CPU_TEMP);
        let battery = merged.battery.unwrap_or(cpu * BATTERY_FROM_CPU_RATIO);
        let system = merged.system.unwrap_or(cpu * SYSTEM_FROM_CPU_RATIO);

        if contributor.is_none() {
            tracing::warn!("no temperature source answered, serving derived defaults");
        }

        ResolvedTemperatures {
            cpu,
            battery,
            system,
            source: contributor.unwrap_or(SourceKind::Fallback),
        }
    }

    async fn acquire_system_load(&self) -> SystemLoadReading {
        for source in &self.sources {
            match source.read_system_load().await {
                Ok(reading) => return reading,
                Err(e) => {
                    tracing::debug!(source = %source.kind(), error = %e, "load read failed, trying next source");
                }
            }
        }
        tracing::warn!("all load sources exhausted, using simulated reading");
        simulated::system_load()
    }
}

/// Copy categories from `incoming` into gaps of `merged`. Returns whether
/// anything was filled (i.e. this stage contributed data).
fn merge_missing(merged: &mut TemperatureReading, incoming: &TemperatureReading) -> bool {
    let mut filled = false;
    if merged.cpu.is_none() && incoming.cpu.is_some() {
        merged.cpu = incoming.cpu;
        filled = true;
    }
    if merged.battery.is_none() && incoming.battery.is_some() {
        merged.battery = incoming.battery;
        filled = true;
    }
    if merged.system.is_none() && incoming.system.is_some() {
        merged.system = incoming.system;
        filled = true;
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{TelemetryError, TelemetrySource};
    use async_trait::async_trait;

    /// Source that fails every group.
    struct DeadSource;

    #[async_trait]
    impl TelemetrySource for DeadSource {
        fn kind(&self) -> SourceKind {
            SourceKind::HardwareMonitor
        }
        async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
            Err(TelemetryError::Unavailable("dead".to_string()))
        }
        async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
            Err(TelemetryError::Unavailable("dead".to_string()))
        }
        async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError> {
            Err(TelemetryError::Unavailable("dead".to_string()))
        }
    }

    /// Source that only knows the CPU temperature.
    struct CpuOnlySource;

    #[async_trait]
    impl TelemetrySource for CpuOnlySource {
        fn kind(&self) -> SourceKind {
            SourceKind::HardwareMonitor
        }
        async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
            Err(TelemetryError::Unavailable("no battery".to_string()))
        }
        async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
            Ok(TemperatureReading {
                cpu: Some(60.0),
                ..TemperatureReading::default()
            })
        }
        async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError> {
            Err(TelemetryError::Unavailable("no load".to_string()))
        }
    }

    #[tokio::test]
    async fn test_acquire_never_fails_with_dead_sources() {
        let aggregator = TelemetryAggregator::new(vec![Arc::new(DeadSource)]);
        let snapshot = aggregator.acquire().await;

        assert_eq!(snapshot.battery.source, SourceKind::Simulated);
        assert_eq!(snapshot.system.source, SourceKind::Simulated);
        // No stage answered temperatures: derived defaults, tagged fallback
        assert_eq!(snapshot.temperatures.source, SourceKind::Fallback);
        assert!((snapshot.temperatures.cpu - 45.0).abs() < 1e-9);
        assert!((snapshot.temperatures.battery - 36.0).abs() < 1e-9);
        assert!((snapshot.temperatures.system - 31.5).abs() < 1e-9);
        assert_eq!(snapshot.source, SourceKind::Mixed);
    }

    #[tokio::test]
    async fn test_partial_temperatures_derive_from_cpu() {
        let aggregator = TelemetryAggregator::new(vec![Arc::new(CpuOnlySource)]);
        let snapshot = aggregator.acquire().await;

        assert_eq!(snapshot.temperatures.source, SourceKind::HardwareMonitor);
        assert!((snapshot.temperatures.cpu - 60.0).abs() < 1e-9);
        assert!((snapshot.temperatures.battery - 48.0).abs() < 1e-9);
        assert!((snapshot.temperatures.system - 42.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_simulated_only_snapshot_is_uniform() {
        let aggregator = TelemetryAggregator::simulated_only();
        let snapshot = aggregator.acquire().await;
        assert_eq!(snapshot.source, SourceKind::Simulated);
        assert_eq!(snapshot.battery.source, SourceKind::Simulated);
        assert_eq!(snapshot.temperatures.source, SourceKind::Simulated);
    }

    #[tokio::test]
    async fn test_empty_ranking_still_produces_snapshot() {
        let aggregator = TelemetryAggregator::new(Vec::new());
        let snapshot = aggregator.acquire().await;
        assert_eq!(snapshot.battery.source, SourceKind::Simulated);
        assert_eq!(snapshot.temperatures.source, SourceKind::Fallback);
    }
}
