//! Hardware-monitor telemetry provider (Linux sysfs/procfs).
//!
//! Reads named temperature sensors from `/sys/class/hwmon`, battery state
//! from `/sys/class/power_supply`, and CPU/memory load from `/proc`. The
//! root paths are injectable so tests can point the provider at a fixture
//! tree.

use super::{TelemetryError, TelemetrySource};
use crate::types::{BatteryReading, SourceKind, SystemLoadReading, TemperatureReading};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interval between the two `/proc/stat` samples used for the CPU
/// load percentage.
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Telemetry provider backed by the kernel's hwmon/power_supply/procfs
/// interfaces.
pub struct HwmonSource {
    hwmon_root: PathBuf,
    power_supply_root: PathBuf,
    proc_root: PathBuf,
}

impl HwmonSource {
    pub fn new() -> Self {
        Self {
            hwmon_root: PathBuf::from("/sys/class/hwmon"),
            power_supply_root: PathBuf::from("/sys/class/power_supply"),
            proc_root: PathBuf::from("/proc"),
        }
    }

    /// Build a provider over alternative root paths (fixture trees in tests).
    pub fn with_roots(
        hwmon_root: impl Into<PathBuf>,
        power_supply_root: impl Into<PathBuf>,
        proc_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hwmon_root: hwmon_root.into(),
            power_supply_root: power_supply_root.into(),
            proc_root: proc_root.into(),
        }
    }

    /// Scan all hwmon devices and assign each temperature sensor to the
    /// first matching category (cpu/battery/system, case-insensitive
    /// substring on the sensor label). Later matches for an already-filled
    /// category are ignored.
    fn scan_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
        let mut reading = TemperatureReading::default();
        let mut found_any = false;

        for device in sorted_entries(&self.hwmon_root)? {
            let device_name = read_trimmed(&device.join("name")).unwrap_or_default();

            for input in sorted_temp_inputs(&device) {
                let Some(celsius) = read_millidegrees(&input) else {
                    continue;
                };
                found_any = true;

                // Prefer the per-sensor label; unlabeled sensors fall back
                // to the device name (e.g. "coretemp").
                let label_path: PathBuf = input
                    .to_string_lossy()
                    .replace("_input", "_label")
                    .into();
                let label = read_trimmed(&label_path)
                    .unwrap_or_else(|| device_name.clone())
                    .to_lowercase();

                if label.contains("cpu") && reading.cpu.is_none() {
                    reading.cpu = Some(celsius);
                } else if label.contains("battery") && reading.battery.is_none() {
                    reading.battery = Some(celsius);
                } else if label.contains("system") && reading.system.is_none() {
                    reading.system = Some(celsius);
                }
            }
        }

        if !found_any {
            return Err(TelemetryError::Unavailable(
                "no hwmon temperature sensors found".to_string(),
            ));
        }
        if reading.cpu.is_none() && reading.battery.is_none() && reading.system.is_none() {
            return Err(TelemetryError::Unavailable(
                "no hwmon sensor matched a known category".to_string(),
            ));
        }
        Ok(reading)
    }

    fn scan_battery(&self) -> Result<BatteryReading, TelemetryError> {
        for supply in sorted_entries(&self.power_supply_root)? {
            let kind = read_trimmed(&supply.join("type")).unwrap_or_default();
            if kind != "Battery" {
                continue;
            }

            let level = read_trimmed(&supply.join("capacity"))
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(|| {
                    TelemetryError::Parse(format!(
                        "battery {} has no readable capacity",
                        supply.display()
                    ))
                })?;
            let status =
                read_trimmed(&supply.join("status")).unwrap_or_else(|| "Unknown".to_string());
            // voltage_now is reported in microvolts
            let voltage = read_trimmed(&supply.join("voltage_now"))
                .and_then(|s| s.parse::<f64>().ok())
                .map(|uv| uv / 1_000_000.0);

            return Ok(BatteryReading {
                level: level.min(100),
                charging: status == "Charging",
                status,
                voltage,
                source: SourceKind::HardwareMonitor,
            });
        }

        Err(TelemetryError::Unavailable(
            "no battery device present".to_string(),
        ))
    }

    fn read_memory(&self) -> Result<(u64, u64, u64), TelemetryError> {
        let meminfo = fs::read_to_string(self.proc_root.join("meminfo"))?;
        let total_kb = meminfo_field(&meminfo, "MemTotal:")
            .ok_or_else(|| TelemetryError::Parse("MemTotal missing from meminfo".to_string()))?;
        let free_kb = meminfo_field(&meminfo, "MemAvailable:")
            .or_else(|| meminfo_field(&meminfo, "MemFree:"))
            .ok_or_else(|| TelemetryError::Parse("MemAvailable missing from meminfo".to_string()))?;

        let total_mb = total_kb / 1024;
        let free_mb = free_kb / 1024;
        Ok((total_mb, total_mb.saturating_sub(free_mb), free_mb))
    }

    fn read_cpu_counters(&self) -> Result<(u64, u64), TelemetryError> {
        let stat = fs::read_to_string(self.proc_root.join("stat"))?;
        let line = stat
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| TelemetryError::Parse("aggregate cpu line missing".to_string()))?;

        let fields: Vec<u64> = line
            .split_whitespace()
            .skip(1)
            .filter_map(|f| f.parse().ok())
            .collect();
        if fields.len() < 5 {
            return Err(TelemetryError::Parse(format!(
                "short cpu line: {line}"
            )));
        }

        let total: u64 = fields.iter().sum();
        // idle + iowait
        let idle = fields[3] + fields[4];
        Ok((total, idle))
    }
}

impl Default for HwmonSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySource for HwmonSource {
    fn kind(&self) -> SourceKind {
        SourceKind::HardwareMonitor
    }

    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
        self.scan_battery()
    }

    async fn read_temperatures(&self) -> Result<TemperatureReading, TelemetryError> {
        self.scan_temperatures()
    }

    async fn read_system_load(&self) -> Result<SystemLoadReading, TelemetryError> {
        let (total_a, idle_a) = self.read_cpu_counters()?;
        tokio::time::sleep(CPU_SAMPLE_INTERVAL).await;
        let (total_b, idle_b) = self.read_cpu_counters()?;

        let d_total = total_b.saturating_sub(total_a);
        let d_idle = idle_b.saturating_sub(idle_a);
        let cpu_usage_pct = if d_total == 0 {
            0.0
        } else {
            100.0 * (d_total.saturating_sub(d_idle)) as f64 / d_total as f64
        };

        let (memory_total_mb, memory_used_mb, memory_free_mb) = self.read_memory()?;

        Ok(SystemLoadReading {
            cpu_usage_pct,
            memory_total_mb,
            memory_used_mb,
            memory_free_mb,
            source: SourceKind::HardwareMonitor,
        })
    }
}

/// Directory entries sorted by name, so first-match-wins is deterministic.
fn sorted_entries(root: &Path) -> Result<Vec<PathBuf>, TelemetryError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Ok(entries)
}

fn sorted_temp_inputs(device: &Path) -> Vec<PathBuf> {
    let Ok(dir) = fs::read_dir(device) else {
        return Vec::new();
    };
    let mut inputs: Vec<PathBuf> = dir
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("temp") && n.ends_with("_input"))
        })
        .collect();
    inputs.sort();
    inputs
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_millidegrees(path: &Path) -> Option<f64> {
    read_trimmed(path)?.parse::<f64>().ok().map(|m| m / 1000.0)
}

fn meminfo_field(meminfo: &str, key: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|l| l.starts_with(key))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture_source(root: &TempDir) -> HwmonSource {
        HwmonSource::with_roots(
            root.path().join("hwmon"),
            root.path().join("power_supply"),
            root.path().join("proc"),
        )
    }

    #[tokio::test]
    async fn test_temperature_first_match_wins() {
        let root = TempDir::new().unwrap();
        let dev = root.path().join("hwmon/hwmon0");
        write(&dev.join("name"), "thermal\n");
        write(&dev.join("temp1_label"), "CPU Package\n");
        write(&dev.join("temp1_input"), "52000\n");
        write(&dev.join("temp2_label"), "CPU Core 1\n");
        write(&dev.join("temp2_input"), "61000\n");
        write(&dev.join("temp3_label"), "Battery\n");
        write(&dev.join("temp3_input"), "34500\n");

        let source = fixture_source(&root);
        let reading = source.read_temperatures().await.unwrap();

        // First "cpu" match taken, second ignored
        assert_eq!(reading.cpu, Some(52.0));
        assert_eq!(reading.battery, Some(34.5));
        assert!(reading.system.is_none());
    }

    #[tokio::test]
    async fn test_unlabeled_sensor_uses_device_name() {
        let root = TempDir::new().unwrap();
        let dev = root.path().join("hwmon/hwmon0");
        write(&dev.join("name"), "cpu_thermal\n");
        write(&dev.join("temp1_input"), "48000\n");

        let source = fixture_source(&root);
        let reading = source.read_temperatures().await.unwrap();
        assert_eq!(reading.cpu, Some(48.0));
    }

    #[tokio::test]
    async fn test_missing_hwmon_root_is_unavailable() {
        let root = TempDir::new().unwrap();
        let source = fixture_source(&root);
        assert!(source.read_temperatures().await.is_err());
    }

    #[tokio::test]
    async fn test_battery_scan() {
        let root = TempDir::new().unwrap();
        let bat = root.path().join("power_supply/BAT0");
        write(&bat.join("type"), "Battery\n");
        write(&bat.join("capacity"), "87\n");
        write(&bat.join("status"), "Charging\n");
        write(&bat.join("voltage_now"), "12300000\n");
        // AC adapter entries must be skipped
        let ac = root.path().join("power_supply/AC");
        write(&ac.join("type"), "Mains\n");

        let source = fixture_source(&root);
        let reading = source.read_battery().await.unwrap();
        assert_eq!(reading.level, 87);
        assert!(reading.charging);
        assert_eq!(reading.status, "Charging");
        assert!((reading.voltage.unwrap() - 12.3).abs() < 1e-9);
        assert_eq!(reading.source, SourceKind::HardwareMonitor);
    }

    #[tokio::test]
    async fn test_no_battery_device() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("power_supply")).unwrap();
        let source = fixture_source(&root);
        assert!(source.read_battery().await.is_err());
    }

    #[tokio::test]
    async fn test_system_load_from_procfs() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join("proc/stat"),
            "cpu  100 0 100 700 100 0 0 0 0 0\n",
        );
        write(
            &root.path().join("proc/meminfo"),
            "MemTotal:       16384000 kB\nMemFree:         2048000 kB\nMemAvailable:    8192000 kB\n",
        );

        let source = fixture_source(&root);
        let load = source.read_system_load().await.unwrap();
        assert_eq!(load.memory_total_mb, 16000);
        assert_eq!(load.memory_free_mb, 8000);
        assert_eq!(load.memory_used_mb, 8000);
        // Identical samples: zero delta resolves to 0% rather than NaN
        assert!((load.cpu_usage_pct - 0.0).abs() < 1e-9);
    }
}
