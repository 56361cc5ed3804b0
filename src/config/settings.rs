//! Settings structures and TOML loading.

use serde::Deserialize;
use std::path::Path;

/// Top-level service settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub telemetry: TelemetrySettings,
    pub model: ModelSettings,
    pub advisor: AdvisorSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address for the HTTP API
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Raw thermal-zone file for the secondary ACPI temperature source
    pub acpi_zone: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            acpi_zone: "/sys/class/thermal/thermal_zone0/temp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Path to the serialized predictive-model artifact
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: "model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    /// Base URL of the external reasoning service
    pub endpoint: String,
    /// Model name passed to the reasoning service
    pub model: String,
    /// Environment variable holding the service API key. The remote
    /// advisor is only constructed when this variable is set.
    pub api_key_env: String,
    /// Bound on each reasoning-service call
    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-pro".to_string(),
            api_key_env: "THERMOSENSE_API_KEY".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Sled database directory for advisory history
    pub path: String,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: "advisory_history.db".to_string(),
        }
    }
}

impl Settings {
    /// Load settings following the documented order. A present-but-broken
    /// file is logged and replaced by defaults rather than aborting
    /// startup.
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let candidate = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("THERMOSENSE_CONFIG").ok().map(Into::into))
            .unwrap_or_else(|| "thermosense.toml".into());

        match std::fs::read_to_string(&candidate) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(settings) => {
                    tracing::info!(path = %candidate.display(), "loaded configuration");
                    settings
                }
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("no config file found, using defaults");
                Self::default()
            }
        }
    }
}
