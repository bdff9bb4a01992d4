//! Axum-based HTTP server for the remote control facade.
//!
//! Provides REST endpoints for:
//! - POST `/api/dispense/tower` - Run the tower dispense routine
//! - POST `/api/dispense/pencil` - Run the pencil dispense routine
//! - POST `/api/calibrate/tower` - Run the tower calibration routine
//! - GET `/api/motor/:port/position` - Read a motor position
//! - POST `/api/motor/:port/position` - Pass-through positional move
//! - GET `/` - Liveness text
//!
//! Every motor-touching request goes through the same per-motor locks
//! as the buttons, so a remote dispense and a button press on the
//! same motor serialize instead of racing. Dispatches block for
//! seconds, so each handler pushes the work onto the blocking thread
//! pool rather than stalling the async runtime.

use std::net::SocketAddr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::motor::MotorPort;
use crate::router::{ActionRouter, DispatchOutcome, RemoteCommand, Trigger};
use crate::traits::PositionMotor;

use super::api::{ApiResponse, CommandResponse, MoveRequest, PositionResponse};

// ============================================================================
// Route Handlers
// ============================================================================

/// Dispatch a remote command on the blocking pool and shape the reply.
async fn run_remote<M: PositionMotor + Send + 'static>(
    router: ActionRouter<M>,
    command: RemoteCommand,
    report_position: bool,
) -> Json<ApiResponse<CommandResponse>> {
    let result = tokio::task::spawn_blocking(move || {
        let outcome = router.dispatch(Trigger::Remote(command))?;
        let position = match &outcome {
            DispatchOutcome::Completed { .. } if report_position => {
                let port = router
                    .action_for(Trigger::Remote(command))
                    .map(|a| a.port());
                port.and_then(|p| router.brick().position(p).ok())
            }
            _ => None,
        };
        Ok::<_, crate::error::ActionError>((outcome, position))
    })
    .await;

    match result {
        Ok(Ok((DispatchOutcome::Completed { action }, position))) => {
            let mut resp = CommandResponse::completed(action);
            if let Some(position) = position {
                resp = resp.with_position(position);
            }
            Json(ApiResponse::ok(resp))
        }
        Ok(Ok((DispatchOutcome::Ignored, _))) => Json(ApiResponse::ok(CommandResponse::ignored())),
        Ok(Err(e)) => Json(ApiResponse::err(e.to_string())),
        Err(_) => Json(ApiResponse::err("dispatch worker failed")),
    }
}

/// POST /api/dispense/tower
async fn dispense_tower<M: PositionMotor + Send + 'static>(
    State(router): State<ActionRouter<M>>,
) -> Json<ApiResponse<CommandResponse>> {
    run_remote(router, RemoteCommand::TowerDispense, false).await
}

/// POST /api/dispense/pencil
async fn dispense_pencil<M: PositionMotor + Send + 'static>(
    State(router): State<ActionRouter<M>>,
) -> Json<ApiResponse<CommandResponse>> {
    run_remote(router, RemoteCommand::PencilDispense, false).await
}

/// POST /api/calibrate/tower - responds with the final motor position
async fn calibrate_tower<M: PositionMotor + Send + 'static>(
    State(router): State<ActionRouter<M>>,
) -> Json<ApiResponse<CommandResponse>> {
    run_remote(router, RemoteCommand::TowerCalibrate, true).await
}

/// GET /api/motor/:port/position
async fn get_motor_position<M: PositionMotor + Send + 'static>(
    State(router): State<ActionRouter<M>>,
    Path(port): Path<String>,
) -> Json<ApiResponse<PositionResponse>> {
    let Some(port) = MotorPort::from_text(&port) else {
        return Json(ApiResponse::err(format!("unknown motor port '{port}'")));
    };

    let result = tokio::task::spawn_blocking(move || router.brick().position(port)).await;
    match result {
        Ok(Ok(position)) => Json(ApiResponse::ok(PositionResponse {
            port: port.as_str().into(),
            position,
        })),
        Ok(Err(e)) => Json(ApiResponse::err(e.to_string())),
        Err(_) => Json(ApiResponse::err("position worker failed")),
    }
}

/// POST /api/motor/:port/position
///
/// Accepts JSON: `{"speed": 30, "position": 120, "direction": "shortest"}`
async fn set_motor_position<M: PositionMotor + Send + 'static>(
    State(router): State<ActionRouter<M>>,
    Path(port): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Json<ApiResponse<PositionResponse>> {
    let Some(port) = MotorPort::from_text(&port) else {
        return Json(ApiResponse::err(format!("unknown motor port '{port}'")));
    };
    if !(-100..=100).contains(&request.speed) {
        return Json(ApiResponse::err("speed must be between -100 and 100"));
    }

    log::info!(
        "remote move: motor {port} to {} at speed {}",
        request.position,
        request.speed
    );
    let result = tokio::task::spawn_blocking(move || {
        router.brick().move_motor(port, request.speed, request.position)
    })
    .await;

    match result {
        Ok(Ok(position)) => Json(ApiResponse::ok(PositionResponse {
            port: port.as_str().into(),
            position,
        })),
        Ok(Err(e)) => Json(ApiResponse::err(e.to_string())),
        Err(_) => Json(ApiResponse::err("move worker failed")),
    }
}

/// GET / - Liveness text
async fn index() -> &'static str {
    "brick-commander is running."
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<M: PositionMotor + Send + 'static>(
    router: ActionRouter<M>,
    config: &WebServerConfig,
) -> Router {
    let mut app = Router::new()
        // API routes
        .route("/api/dispense/tower", post(dispense_tower::<M>))
        .route("/api/dispense/pencil", post(dispense_pencil::<M>))
        .route("/api/calibrate/tower", post(calibrate_tower::<M>))
        .route(
            "/api/motor/:port/position",
            get(get_motor_position::<M>).post(set_motor_position::<M>),
        )
        // Liveness
        .route("/", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(router);

    // Add CORS if requested
    if config.cors_permissive {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

/// Start the web server.
///
/// This function blocks until the server is shut down. The router is
/// typically a clone of the one the button dispatcher uses, so both
/// paths share the same motor locks.
pub async fn run_server<M: PositionMotor + Send + 'static>(
    router: ActionRouter<M>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let app = build_router(router, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    log::info!("web server listening on http://{}", config.addr);

    axum::serve(listener, app).await
}
