//! ThermoSense advisory service binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve with platform telemetry (hwmon → ACPI → simulated cascade)
//! cargo run --release
//!
//! # Force simulated telemetry only (no hardware access)
//! cargo run --release -- --simulate
//! ```
//!
//! # Environment Variables
//!
//! - `THERMOSENSE_CONFIG`: path to the TOML config file
//! - `THERMOSENSE_API_KEY`: reasoning-service key (name configurable);
//!   without it the deterministic fallback advisor serves all requests
//! - `THERMOSENSE_CORS_ORIGINS`: comma-separated allowed CORS origins
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thermosense::advisor::{AdviceGenerator, RemoteAdvisor};
use thermosense::api::{create_app, ApiState};
use thermosense::config::{self, Settings};
use thermosense::engine::AdvisoryEngine;
use thermosense::history::AdvisoryHistory;
use thermosense::scoring::LinearModel;
use thermosense::telemetry::{
    AcpiThermalSource, HwmonSource, SimulatedSource, TelemetryAggregator, TelemetrySource,
};

#[derive(Parser, Debug)]
#[command(name = "thermosense")]
#[command(about = "ThermoSense thermal & battery advisory service")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default from config: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use simulated telemetry only (skip hardware sources)
    #[arg(long)]
    simulate: bool,
}

/// Build the telemetry source ranking.
fn build_telemetry(args: &CliArgs, settings: &Settings) -> TelemetryAggregator {
    if args.simulate {
        info!("telemetry: simulated sources only (--simulate)");
        return TelemetryAggregator::simulated_only();
    }

    let sources: Vec<Arc<dyn TelemetrySource>> = vec![
        Arc::new(HwmonSource::new()),
        Arc::new(AcpiThermalSource::new(&settings.telemetry.acpi_zone)),
        Arc::new(SimulatedSource),
    ];
    TelemetryAggregator::new(sources)
}

/// Construct the remote advisor when its API key is configured.
fn build_remote_advisor(settings: &Settings) -> Option<Arc<dyn AdviceGenerator>> {
    let advisor = &settings.advisor;
    let Ok(api_key) = std::env::var(&advisor.api_key_env) else {
        warn!(
            key_env = %advisor.api_key_env,
            "no reasoning-service API key set, advice falls back to deterministic text"
        );
        return None;
    };

    match RemoteAdvisor::new(
        &advisor.endpoint,
        &advisor.model,
        &api_key,
        Duration::from_secs(advisor.timeout_secs),
    ) {
        Ok(remote) => {
            info!(endpoint = %advisor.endpoint, model = %advisor.model, "remote advisor enabled");
            Some(Arc::new(remote))
        }
        Err(e) => {
            warn!(error = %e, "failed to build remote advisor, using fallback only");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();
    config::init(Settings::load(args.config.as_deref()));
    let settings = config::get();

    let history = AdvisoryHistory::open(&settings.history.path)
        .with_context(|| format!("opening history store at {}", settings.history.path))?;
    info!(path = %settings.history.path, records = history.count(), "history store ready");

    // Loaded once before serving; immutable afterwards.
    let model = LinearModel::load_or_default(&settings.model.path);

    let telemetry = Arc::new(build_telemetry(&args, settings));
    let remote = build_remote_advisor(settings);
    let engine = Arc::new(AdvisoryEngine::new(model, remote, history));

    let app = create_app(ApiState { engine, telemetry });

    let addr = args.addr.unwrap_or_else(|| settings.server.addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "ThermoSense advisory API listening");

    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown_signal.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("serving HTTP")?;

    info!("shutdown complete");
    Ok(())
}
