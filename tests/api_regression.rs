//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the advisory endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use thermosense::api::{create_app, ApiState};
use thermosense::config::{self, Settings};
use thermosense::engine::AdvisoryEngine;
use thermosense::history::AdvisoryHistory;
use thermosense::scoring::LinearModel;
use thermosense::telemetry::TelemetryAggregator;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

fn ensure_config() {
    if !config::is_initialized() {
        config::init(Settings::default());
    }
}

fn create_test_state() -> ApiState {
    ApiState {
        engine: Arc::new(AdvisoryEngine::new(
            LinearModel::default(),
            None,
            AdvisoryHistory::open_temp().unwrap(),
        )),
        telemetry: Arc::new(TelemetryAggregator::simulated_only()),
    }
}

fn advice_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/advice")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// All GET endpoints should return 200.
#[tokio::test]
async fn test_get_endpoints_return_200() {
    ensure_config();

    let endpoints = [
        "/",
        "/health",
        "/api/sensors",
        "/api/advice/history",
        "/api/advice/statistics",
    ];

    for endpoint in &endpoints {
        let app = create_app(create_test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri(*endpoint)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            resp.status().is_success(),
            "GET {endpoint} returned status {}",
            resp.status()
        );
    }
}

/// /api/sensors returns a fully resolved snapshot: every temperature
/// category populated, source tag present.
#[tokio::test]
async fn test_sensors_snapshot_is_complete() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/sensors")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    for field in ["cpu", "battery", "system"] {
        assert!(
            body["temperatures"][field].is_number(),
            "temperatures.{field} missing from snapshot: {body}"
        );
    }
    assert_eq!(body["source"], "simulated");
    assert!(body["battery"]["level"].as_u64().unwrap() <= 100);
}

/// Danger scenario from the advisory contract: hot battery + hot CPU while
/// charging must classify danger with a non-null action and bounded impact.
#[tokio::test]
async fn test_advice_danger_scenario() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(advice_request(
            r#"{"battery_temp": 50.0, "ambient_temp": 30.0, "device_state": "charging", "cpu_temp": 90.0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["alert_level"], "danger");
    assert!(!body["recommended_action"].is_null());
    let impact = body["predicted_health_impact"].as_f64().unwrap();
    assert!((0.0..=0.15).contains(&impact));
    // No remote configured: text came from the deterministic fallback
    assert_eq!(body["advice_source"], "fallback");
}

/// Safe scenario: cool idle device without a CPU reading.
#[tokio::test]
async fn test_advice_safe_scenario() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(advice_request(
            r#"{"battery_temp": 30.0, "ambient_temp": 25.0, "device_state": "idle", "cpu_temp": null}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["alert_level"], "safe");
    assert!(body["recommended_action"].is_null());
}

/// Advisories accumulate into history (newest first) and statistics.
#[tokio::test]
async fn test_history_accumulates_and_orders() {
    ensure_config();
    let state = create_test_state();

    for body in [
        r#"{"battery_temp": 28.0, "ambient_temp": 24.0, "device_state": "idle"}"#,
        r#"{"battery_temp": 52.0, "ambient_temp": 31.0, "device_state": "charging"}"#,
    ] {
        let app = create_app(state.clone());
        let resp = app.oneshot(advice_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let app = create_app(state.clone());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/advice/history?limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(resp).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    // limit=1 returns the most recent record (the hot charging one)
    assert_eq!(history[0]["conditions"]["battery_temp"], 52.0);

    let app = create_app(state);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/advice/statistics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let stats = json_body(resp).await;
    assert_eq!(stats["total_advisories"], 2);
    assert_eq!(stats["safe_count"], 1);
    assert_eq!(stats["danger_count"], 1);
    assert_eq!(stats["most_recent_alert"], "danger");
}

/// Unknown device states are rejected at the boundary, not deep in the
/// engine.
#[tokio::test]
async fn test_unknown_device_state_is_client_error() {
    ensure_config();
    let app = create_app(create_test_state());

    let resp = app
        .oneshot(advice_request(
            r#"{"battery_temp": 30.0, "ambient_temp": 25.0, "device_state": "hovering"}"#,
        ))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
