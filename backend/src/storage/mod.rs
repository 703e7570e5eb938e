//! # Storage Module
//!
//! Persistence for attendance entries. The domain layer only sees
//! [`AttendanceStorage`]; the CSV repository is the implementation used by
//! the server.

pub mod connection;
pub mod csv_attendance_repository;
pub mod traits;

pub use connection::CsvConnection;
pub use csv_attendance_repository::CsvAttendanceRepository;
pub use traits::AttendanceStorage;
