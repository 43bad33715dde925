//! Attendance service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        EnrollmentLatestResponse, RegisterRfidRequest, ScanRequest, ScanResponse,
        SuccessResponse,
    },
    state::AppState,
    view::render_csv,
};

/// Create the router for the attendance service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/attendance", get(get_attendance))
        .route("/api/attendance/export", get(export_attendance))
        .route("/api/rfid", post(register_rfid))
        .route("/api/scan", post(scan))
        .route("/api/enroll/start", post(start_enrollment))
        .route("/api/enroll/stop", post(stop_enrollment))
        .route("/api/enroll/latest", get(latest_enrollment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            error!("Store health check failed: {}", e);
            false
        }
    };

    Json(json!({
        "status": "ok",
        "service": "attendance-service",
        "database": database,
        "enrollment_active": state.enrollment.is_active().await,
    }))
}

/// Latest status of every registered user
pub async fn get_attendance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state
        .attendance_view
        .list_records()
        .await
        .map_err(|e| ApiError::from_attendance(e, "Failed to fetch attendance data"))?;

    Ok(Json(records))
}

/// Attendance report as CSV
pub async fn export_attendance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state
        .attendance_view
        .list_records()
        .await
        .map_err(|e| ApiError::from_attendance(e, "Failed to fetch attendance data"))?;

    let disposition = format!(
        "attachment; filename=\"attendance-report-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_csv(&records),
    ))
}

/// Treat a body that is absent or not usable JSON as an empty payload, so
/// the missing-field validation answers with its usual 400.
fn payload_or_default<T: Default>(body: Result<Json<T>, JsonRejection>, path: &str) -> T {
    match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("Unusable request body on {}: {}", path, rejection.body_text());
            T::default()
        }
    }
}

/// Register a new badge
pub async fn register_rfid(
    State(state): State<AppState>,
    body: Result<Json<RegisterRfidRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = payload_or_default(body, "/api/rfid");
    if payload.department.is_some() {
        warn!("Department supplied for registration is not persisted");
    }

    let rfid = payload.rfid.unwrap_or_default();
    let name = payload.name.unwrap_or_default();

    state
        .user_directory
        .register_user(&rfid, &name)
        .await
        .map_err(|e| ApiError::from_attendance(e, "Failed to add RFID"))?;

    Ok(Json(SuccessResponse::ok()))
}

/// RFID tap: enrollment capture or attendance toggle
pub async fn scan(
    State(state): State<AppState>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = payload_or_default(body, "/api/scan");
    let rfid_uid = payload.rfid_uid.unwrap_or_default();

    let result = state
        .toggle_engine
        .record_scan(&rfid_uid, payload.device_id.as_deref())
        .await
        .map_err(|e| ApiError::from_attendance(e, "Scan failed"))?;

    Ok(Json(ScanResponse::from(result)))
}

/// Arm enrollment mode
pub async fn start_enrollment(State(state): State<AppState>) -> impl IntoResponse {
    state.enrollment.start().await;
    Json(SuccessResponse::ok())
}

/// Disarm enrollment mode
pub async fn stop_enrollment(State(state): State<AppState>) -> impl IntoResponse {
    state.enrollment.stop().await;
    Json(SuccessResponse::ok())
}

/// Last UID captured while enrollment is armed
pub async fn latest_enrollment(State(state): State<AppState>) -> impl IntoResponse {
    Json(EnrollmentLatestResponse {
        rfid_uid: state.enrollment.poll_latest().await,
    })
}
