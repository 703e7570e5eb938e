//! # REST Layer
//!
//! Axum handlers for the attendance record store. Handlers stay thin: they
//! translate between HTTP and [`AttendanceService`] and map service errors to
//! status codes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use shared::{AttendanceQuery, DeleteAttendanceResponse, SaveAttendanceRequest, SaveAttendanceResponse};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::domain::{AttendanceService, ServiceError};

pub const SAVE_SUCCESS_MESSAGE: &str = "Attendance data saved successfully";

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub attendance_service: AttendanceService,
}

impl AppState {
    pub fn new(attendance_service: AttendanceService) -> Self {
        Self { attendance_service }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(e) => {
                error!("Storage failure: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// GET /api/attendance?month=&year=
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("GET /api/attendance - query: {:?}", query);

    let records = state.attendance_service.list_records(query.into()).await?;
    Ok(Json(records))
}

/// POST /api/attendance
pub async fn save_attendance(
    State(state): State<AppState>,
    Json(request): Json<SaveAttendanceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    info!(
        "POST /api/attendance - {} records for {}",
        request.attendance_data.len(),
        request.period()
    );

    let records = state
        .attendance_service
        .save_records(request.period(), &request.attendance_data)
        .await?;

    Ok(Json(SaveAttendanceResponse {
        records,
        success_message: SAVE_SUCCESS_MESSAGE.to_string(),
    }))
}

/// DELETE /api/attendance/:reg_number
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(reg_number): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("DELETE /api/attendance/{}", reg_number);

    let deleted_count = state
        .attendance_service
        .delete_by_register_number(&reg_number)
        .await?;

    Ok(Json(DeleteAttendanceResponse {
        success_message: format!("Deleted {} record(s) for {}", deleted_count, reg_number),
        register_number: reg_number,
        deleted_count,
    }))
}

/// Build the CORS layer; `None` or `"*"` allows any origin
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    match allowed_origin {
        Some(origin) if origin != "*" => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                warn!("Invalid allowed origin {:?}, allowing any origin", origin);
                cors.allow_origin(Any)
            }
        },
        _ => cors.allow_origin(Any),
    }
}

/// Router with every attendance route under `/api`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/attendance", get(list_attendance).post(save_attendance))
        .route("/api/attendance/:reg_number", delete(delete_attendance))
        .with_state(state)
}
