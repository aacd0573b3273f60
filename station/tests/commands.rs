// Integration tests for the control/status REST client against a mock backend
// mirroring the real routes and response shapes.

use std::net::SocketAddr;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use skylink_core::model::Vector3;
use skylink_station::commands::DroneCommands;
use skylink_station::config::StationConfig;
use skylink_station::error::StationError;

async fn ack() -> impl IntoResponse {
    Json(json!({"success": true}))
}

async fn takeoff(Json(body): Json<Value>) -> impl IntoResponse {
    let has_altitude = body.get("altitude").and_then(Value::as_f64).is_some();
    Json(json!({"success": has_altitude}))
}

async fn move_cmd(Json(body): Json<Value>) -> impl IntoResponse {
    let has_velocity = body
        .get("velocity")
        .and_then(|velocity| velocity.get("x"))
        .is_some();
    Json(json!({"success": has_velocity}))
}

async fn land() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"detail": "Not connected to AirSim"})),
    )
}

async fn emergency() -> impl IntoResponse {
    Json(json!({"success": true, "message": "Emergency stop activated"}))
}

async fn state() -> impl IntoResponse {
    Json(json!({
        "position": {"x": 1.0, "y": 2.0, "z": -10.0, "timestamp": "2024-05-11T09:30:00.120000"},
        "attitude": {"roll": 0.1, "pitch": -0.2, "yaw": 45.0, "timestamp": "2024-05-11T09:30:00.120000"},
        "velocity": {"vx": 0.5, "vy": 0.0, "vz": 0.0},
        "is_armed": true,
        "is_flying": false,
        "battery_level": 92.5,
        "gps_location": {"latitude": 47.64, "longitude": -122.14, "altitude": 120.5}
    }))
}

async fn position() -> impl IntoResponse {
    Json(json!({"x": 1.0, "y": 2.0, "z": -10.0, "timestamp": "2024-05-11T09:30:00.120000"}))
}

async fn spawn_mock_backend() -> StationConfig {
    let app = Router::new()
        .route("/api/v1/control/arm", post(ack))
        .route("/api/v1/control/disarm", post(ack))
        .route("/api/v1/control/takeoff", post(takeoff))
        .route("/api/v1/control/land", post(land))
        .route("/api/v1/control/move", post(move_cmd))
        .route("/api/v1/control/goto", post(ack))
        .route("/api/v1/control/hover", post(ack))
        .route("/api/v1/control/emergency", post(emergency))
        .route("/api/v1/status/state", get(state))
        .route("/api/v1/status/position", get(position));
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let base = format!("http://{}", server.local_addr());
    tokio::spawn(server);
    StationConfig {
        drone_http_base: base,
        ..StationConfig::default()
    }
}

#[tokio::test]
async fn arm_returns_success_ack() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let ack = commands.arm().await.unwrap();
    assert!(ack.success);
    assert!(ack.message.is_none());
}

#[tokio::test]
async fn takeoff_carries_altitude() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let ack = commands.takeoff(25.0).await.unwrap();
    assert!(ack.success);
}

#[tokio::test]
async fn move_carries_velocity_vector() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let ack = commands
        .move_by(Vector3::new(1.0, 0.0, -0.5), Some(2.0))
        .await
        .unwrap();
    assert!(ack.success);
}

#[tokio::test]
async fn rejected_command_surfaces_detail_once() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let err = commands.land().await.unwrap_err();
    match err {
        StationError::Rejected { status, detail } => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert_eq!(detail.as_deref(), Some("Not connected to AirSim"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn emergency_stop_carries_message() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let ack = commands.emergency_stop().await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("Emergency stop activated"));
}

#[tokio::test]
async fn state_decodes_nested_records() {
    let config = spawn_mock_backend().await;
    let commands = DroneCommands::new(&config).unwrap();
    let state = commands.state().await.unwrap();
    assert_eq!(state.battery_level, 92.5);
    assert!(state.is_armed);
    assert!(!state.is_flying);
    assert!(state.position.timestamp.is_some());
    assert_eq!(state.gps_location.unwrap().latitude, 47.64);

    let position = commands.position().await.unwrap();
    assert_eq!(position.z, -10.0);
}

#[tokio::test]
async fn transport_failure_is_not_a_rejection() {
    let config = StationConfig {
        drone_http_base: "http://127.0.0.1:1".to_string(),
        ..StationConfig::default()
    };
    let commands = DroneCommands::new(&config).unwrap();
    let err = commands.hover().await.unwrap_err();
    assert!(matches!(err, StationError::Http(_)));
}
