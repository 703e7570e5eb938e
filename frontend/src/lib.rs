//! # Attendance Sheet Frontend
//!
//! The monthly attendance table: an editable, ordered set of student rows for
//! a selected month and year, with a derived percentage column, persistence
//! through a record store, and spreadsheet export.
//!
//! ## Layout
//! - [`state`]: row model and the pure reducer behind the table
//! - [`components`]: [`AttendanceTable`], which drives the reducer around
//!   record-store calls and user notifications
//! - [`services`]: HTTP record store, notifier, exporters, logging
//! - [`config`]: client configuration

pub mod components;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use components::AttendanceTable;
pub use config::ClientConfig;
pub use error::{AttendanceError, ExportError, StoreError};
pub use services::api::ApiClient;
pub use services::export::{exporter_for, CsvExporter, ExportFormat, ExportTable, FileExporter, XlsxExporter};
pub use services::notifier::{Notifier, TracingNotifier};
pub use services::store::RecordStore;
pub use state::{AttendanceRow, FieldValue, Identity, LocalId, RowField, TableState};
