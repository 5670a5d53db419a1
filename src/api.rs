//! REST API handlers for the roster service.
//!
//! The solve endpoints are synchronous from the caller's point of view: the
//! request is validated, solved on the blocking pool and answered in one
//! round trip. INFEASIBLE is a normal 200 response; only malformed input
//! (400) and backend faults (500) map to error statuses.

use axum::{
    extract::rejection::JsonRejection,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::config;
use crate::demo_data::{self, DemoData};
use crate::domain::{AoScheduleRequest, NaScheduleRequest, ScheduleError, ScheduleResponse};
use crate::solver;

/// Creates the API router.
pub fn router() -> Router {
    Router::new()
        // Health & Info
        .route("/health/ao", get(health_ao))
        .route("/health/na", get(health_na))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/ao/{id}", get(get_demo_data_ao))
        .route("/demo-data/na/{id}", get(get_demo_data_na))
        // Solving
        .route("/schedules/ao", post(solve_ao))
        .route("/schedules/na", post(solve_na))
}

// ============================================================================
// Errors
// ============================================================================

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

/// HTTP wrapper around [`ScheduleError`].
#[derive(Debug)]
pub struct AppError(ScheduleError);

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ScheduleError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ScheduleError::SolverFault(_) => {
                error!(error = %self.0, "solver fault");
                (StatusCode::INTERNAL_SERVER_ERROR, "SOLVER_FAULT")
            }
        };
        let body = ApiError {
            code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Health & Info
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health/ao - AÖ liveness, no solving involved.
async fn health_ao() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// GET /health/na - NA liveness, no solving involved.
async fn health_na() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "On-call Scheduling",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "good_lp/HiGHS",
    })
}

// ============================================================================
// Demo data
// ============================================================================

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/ao/{id} - A demo AÖ request.
async fn get_demo_data_ao(Path(id): Path<String>) -> Result<Json<AoScheduleRequest>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate_ao(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// GET /demo-data/na/{id} - A demo NA request.
async fn get_demo_data_na(Path(id): Path<String>) -> Result<Json<NaScheduleRequest>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate_na(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// Solving
// ============================================================================

/// POST /schedules/ao - Solve an AÖ roster request.
async fn solve_ao(
    payload: Result<Json<AoScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let Json(req) = payload.map_err(bad_json)?;
    let cfg = config::global();
    let resp = tokio::task::spawn_blocking(move || solver::solve_ao(&req, cfg))
        .await
        .map_err(|e| ScheduleError::SolverFault(e.to_string()))??;
    Ok(Json(resp))
}

/// POST /schedules/na - Solve an NA roster request.
async fn solve_na(
    payload: Result<Json<NaScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let Json(req) = payload.map_err(bad_json)?;
    let cfg = config::global();
    let resp = tokio::task::spawn_blocking(move || solver::solve_na(&req, cfg))
        .await
        .map_err(|e| ScheduleError::SolverFault(e.to_string()))??;
    Ok(Json(resp))
}

fn bad_json(rejection: JsonRejection) -> AppError {
    AppError(ScheduleError::InvalidRequest(rejection.body_text()))
}
