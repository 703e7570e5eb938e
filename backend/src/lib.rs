//! # Attendance Sheet Backend
//!
//! Record store for the attendance sheet: CSV-backed storage, the attendance
//! domain service and the axum REST layer that serves it.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod domain;
pub mod rest;
pub mod storage;

pub use config::BackendConfig;
pub use domain::{AttendanceService, ServiceError};
pub use rest::AppState;

use storage::{CsvAttendanceRepository, CsvConnection};

/// Wire storage and services for the configured data directory
pub fn initialize(config: &BackendConfig) -> Result<AppState> {
    info!("Using data directory {}", config.data_directory.display());
    let connection = CsvConnection::new(&config.data_directory)?;
    let storage = Arc::new(CsvAttendanceRepository::new(connection));
    Ok(AppState::new(AttendanceService::new(storage)))
}

/// Full application router, CORS included
pub fn build_router(state: AppState, config: &BackendConfig) -> Router {
    rest::router(state).layer(rest::cors_layer(config.allowed_origin.as_deref()))
}
