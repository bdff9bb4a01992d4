//! Integration tests for the web facade.

#![cfg(feature = "web")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use brick_commander::actions::{Action, Calibration, Routine};
use brick_commander::hal::{MockMotor, MotorCall};
use brick_commander::motor::{Brick, MotorPort};
use brick_commander::router::{ActionRouter, RemoteCommand, Trigger};
use brick_commander::traits::PositionMotor;
use brick_commander::services::{
    build_router, ApiResponse, CommandResponse, PositionResponse, WebServerConfig,
};

fn test_app() -> (axum::Router, MockMotor, MockMotor) {
    let mut brick = Brick::new();
    let motor_a = MockMotor::new();
    let motor_b = MockMotor::new();
    brick.attach_motor(MotorPort::A, motor_a.clone());
    brick.attach_motor(MotorPort::B, motor_b.clone());

    let router = ActionRouter::new(brick);
    let app = build_router(router, &WebServerConfig::default());
    (app, motor_a, motor_b)
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn index_reports_liveness() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"brick-commander is running.");
}

#[tokio::test]
async fn dispense_tower_runs_full_sequence_on_motor_b() {
    let (app, motor_a, motor_b) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/dispense/tower")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: ApiResponse<CommandResponse> = body_json(response).await;
    assert!(json.success);
    assert_eq!(json.data.unwrap().action.as_deref(), Some("dispense-tower"));

    assert_eq!(motor_b.call_count(), 7);
    assert_eq!(motor_b.calls()[0], MotorCall::SetSpeed(10));
    assert_eq!(motor_a.call_count(), 0);
}

#[tokio::test]
async fn dispense_pencil_runs_on_motor_a() {
    let (app, motor_a, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/dispense/pencil")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<CommandResponse> = body_json(response).await;
    assert!(json.success);
    assert_eq!(motor_a.call_count(), 3);
    assert_eq!(motor_a.position(), 0);
}

#[tokio::test]
async fn calibrate_tower_reports_final_position() {
    // Fast calibration so the test doesn't settle 100ms per leg.
    let mut brick = Brick::new();
    let motor_b = MockMotor::new();
    brick.attach_motor(MotorPort::B, motor_b.clone());
    let router = ActionRouter::with_routes(
        brick,
        vec![(
            Trigger::Remote(RemoteCommand::TowerCalibrate),
            Action::new(
                "tower-calibrate",
                MotorPort::B,
                Routine::Calibrate(Calibration {
                    cycles: 2,
                    zero_position: -180,
                    nudge: 10,
                    target_speed: 20,
                    settle_ms: 1,
                }),
            ),
        )],
    );
    let app = build_router(router, &WebServerConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/calibrate/tower")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<CommandResponse> = body_json(response).await;
    assert!(json.success);
    let data = json.data.unwrap();
    assert_eq!(data.action.as_deref(), Some("tower-calibrate"));
    assert_eq!(data.position, Some(-180));
}

#[tokio::test]
async fn get_motor_position() {
    let (app, _, motor_b) = test_app();
    motor_b.clone().move_to_position(-42, false).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/motor/b/position")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<PositionResponse> = body_json(response).await;
    assert!(json.success);
    let data = json.data.unwrap();
    assert_eq!(data.port, "B");
    assert_eq!(data.position, -42);
}

#[tokio::test]
async fn get_position_unknown_port_fails() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/motor/e/position")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<PositionResponse> = body_json(response).await;
    assert!(!json.success);
    assert!(json.error.unwrap().contains("unknown motor port"));
}

#[tokio::test]
async fn get_position_unattached_port_fails() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/motor/c/position")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<PositionResponse> = body_json(response).await;
    assert!(!json.success);
    assert!(json.error.unwrap().contains("no motor attached"));
}

#[tokio::test]
async fn set_motor_position_moves_under_lock() {
    let (app, motor_a, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/motor/a/position")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"speed":30,"position":120,"direction":"s"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<PositionResponse> = body_json(response).await;
    assert!(json.success);
    assert_eq!(json.data.unwrap().position, 120);
    assert_eq!(
        motor_a.calls(),
        vec![MotorCall::SetSpeed(30), MotorCall::MoveTo { position: 120 }]
    );
}

#[tokio::test]
async fn set_motor_position_rejects_bad_speed() {
    let (app, motor_a, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/motor/a/position")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"speed":250,"position":0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let json: ApiResponse<PositionResponse> = body_json(response).await;
    assert!(!json.success);
    assert_eq!(motor_a.call_count(), 0);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nothing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
