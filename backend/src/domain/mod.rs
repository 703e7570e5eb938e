pub mod attendance_service;
pub mod models;

pub use attendance_service::{AttendanceService, ServiceError};
pub use models::AttendanceEntry;
