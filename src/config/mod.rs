//! Service Configuration Module
//!
//! TOML-backed settings with built-in defaults, held in a process-wide
//! `OnceLock` initialized once at startup and immutable afterwards.
//!
//! ## Loading Order
//!
//! 1. Explicit `--config` path
//! 2. `THERMOSENSE_CONFIG` environment variable (path to TOML file)
//! 3. `thermosense.toml` in the current working directory
//! 4. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(Settings::load(args.config.as_deref()));
//!
//! // Anywhere in the codebase:
//! let timeout = config::get().advisor.timeout_secs;
//! ```

mod settings;

pub use settings::*;

use std::sync::OnceLock;

/// Global service settings, initialized once at startup.
static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Initialize the global settings.
///
/// Must be called before any call to `get()`. A second call is ignored
/// with a warning so test harnesses can share a process.
pub fn init(settings: Settings) {
    if SETTINGS.set(settings).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global settings.
///
/// Panics if `init()` has not been called; a missing config is a fatal
/// startup bug, not a recoverable condition.
pub fn get() -> &'static Settings {
    SETTINGS
        .get()
        .expect("config::get() called before config::init()")
}

/// Check whether the settings have been initialized. Used by tests and
/// optional config paths.
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}
