//! # Attendance Table Component
//!
//! Owns the table state and wires the reducer to the record store, the
//! notifier and the exporters.
//!
//! Every operation catches its own failure: the failure is logged, turned
//! into a notification where the user needs to know, and also returned so the
//! caller can apply further policy. Load failures degrade silently (logged
//! only), keeping whatever rows were displayed.

use std::path::PathBuf;
use std::sync::Arc;

use shared::AttendancePeriod;
use tracing::{error, info, warn};

use crate::config::ClientConfig;
use crate::error::{AttendanceError, StoreError};
use crate::services::api::ApiClient;
use crate::services::export::{exporter_for, ExportFormat, ExportTable, FileExporter};
use crate::services::logging;
use crate::services::notifier::{Notifier, TracingNotifier};
use crate::services::store::RecordStore;
use crate::state::{reduce, Action, AttendanceRow, FieldValue, Identity, RowField, TableState};

pub const SAVE_SUCCESS_MESSAGE: &str = "Attendance saved successfully!";
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save attendance. Check the logs for details.";
pub const MISSING_REGISTER_NUMBER_MESSAGE: &str = "Cannot delete. Register Number is missing!";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete student. Check the logs for details.";
pub const EXPORT_FAILURE_MESSAGE: &str = "Failed to export attendance. Check the logs for details.";

pub struct AttendanceTable {
    state: TableState,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    exporter: Box<dyn FileExporter>,
}

impl AttendanceTable {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        period: AttendancePeriod,
    ) -> Self {
        Self {
            state: TableState::new(period),
            store,
            notifier,
            exporter: exporter_for(ExportFormat::default(), "."),
        }
    }

    /// Replace the exporter used by [`AttendanceTable::export`]
    pub fn with_exporter(mut self, exporter: Box<dyn FileExporter>) -> Self {
        self.exporter = exporter;
        self
    }

    /// Table for the current month wired from the client configuration:
    /// logging, the HTTP record store and the configured exporter
    pub fn connect(config: &ClientConfig) -> Result<Self, StoreError> {
        logging::init(&config.log_filter);

        let store = ApiClient::new(config)?;
        let table = Self::new(
            Arc::new(store),
            Arc::new(TracingNotifier),
            AttendancePeriod::default(),
        );
        Ok(table.with_exporter(exporter_for(config.export_format, &config.export_dir)))
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn rows(&self) -> &[AttendanceRow] {
        &self.state.rows
    }

    pub fn period(&self) -> AttendancePeriod {
        self.state.period
    }

    /// Run one action through the reducer
    pub fn dispatch(&mut self, action: Action) {
        let period = self.state.period;
        let current = std::mem::replace(&mut self.state, TableState::new(period));
        self.state = reduce(current, action);
    }

    /// Select a period and reload its rows; unsaved edits are discarded
    pub async fn select_period(&mut self, month: u32, year: i32) -> Result<usize, AttendanceError> {
        let period = AttendancePeriod::new(month, year);
        if !period.is_valid() {
            warn!("Selected period {} has an out-of-range month", period);
        }
        self.dispatch(Action::SelectPeriod(period));
        self.load_rows().await
    }

    /// Replace the rows with the store's records for the selected period.
    ///
    /// Returns the number of rows now displayed.
    pub async fn load_rows(&mut self) -> Result<usize, AttendanceError> {
        let period = self.state.period;
        self.dispatch(Action::LoadStarted);

        match self.store.list(period).await {
            Ok(records) => {
                info!("Loaded {} attendance rows for {}", records.len(), period);
                self.dispatch(Action::RowsLoaded { period, records });
                Ok(self.state.row_count())
            }
            Err(source) => {
                error!("Error fetching attendance for {}: {}", period, source);
                self.dispatch(Action::LoadFailed);
                Err(AttendanceError::LoadFailure { period, source })
            }
        }
    }

    /// Append a blank row and return its temporary identity
    pub fn add_row(&mut self) -> Identity {
        let identity = Identity::Local(self.state.peek_local_id());
        self.dispatch(Action::AddRow);
        identity
    }

    pub fn update_field(&mut self, identity: &Identity, field: RowField, value: impl Into<FieldValue>) {
        self.dispatch(Action::UpdateField {
            identity: identity.clone(),
            field,
            value: value.into(),
        });
    }

    /// Derived percentage for one row
    pub fn percentage(&self, identity: &Identity) -> Option<String> {
        self.state.row(identity).map(AttendanceRow::percentage)
    }

    /// Send every row of the selected period to the store.
    ///
    /// On success, rows that were local when sent take the identities the
    /// store assigned.
    pub async fn save_all(&mut self) -> Result<(), AttendanceError> {
        let period = self.state.period;
        let identities: Vec<Identity> = self.state.rows.iter().map(|row| row.identity.clone()).collect();
        let records: Vec<_> = self.state.rows.iter().map(AttendanceRow::to_record).collect();

        self.dispatch(Action::SaveStarted);

        match self.store.save(period, &records).await {
            Ok(saved) => {
                if saved.len() != identities.len() {
                    warn!(
                        "Store returned {} records for {} sent; reconciling by position",
                        saved.len(),
                        identities.len()
                    );
                }
                let assignments = identities
                    .iter()
                    .zip(saved)
                    .filter_map(|(identity, record)| match (identity, record.id) {
                        (Identity::Local(local_id), Some(record_id)) => Some((*local_id, record_id)),
                        _ => None,
                    })
                    .collect();

                info!("Saved {} attendance rows for {}", records.len(), period);
                self.dispatch(Action::SaveCompleted { period, assignments });
                self.notifier.info(SAVE_SUCCESS_MESSAGE);
                Ok(())
            }
            Err(source) => {
                error!("Error saving attendance for {}: {}", period, source);
                self.dispatch(Action::SaveFailed);
                self.notifier.error(SAVE_FAILURE_MESSAGE);
                Err(AttendanceError::SaveFailure { period, source })
            }
        }
    }

    /// Delete a student by register number.
    ///
    /// On success every displayed row with that register number is removed.
    /// Returns the number of records the store deleted.
    pub async fn delete_row(&mut self, register_number: &str) -> Result<u32, AttendanceError> {
        if register_number.trim().is_empty() {
            error!("Missing register number, cannot delete");
            self.notifier.error(MISSING_REGISTER_NUMBER_MESSAGE);
            return Err(AttendanceError::ValidationFailure(
                MISSING_REGISTER_NUMBER_MESSAGE.to_string(),
            ));
        }

        match self.store.delete(register_number).await {
            Ok(deleted) => {
                info!("Deleted {} records for register number {}", deleted, register_number);
                self.dispatch(Action::RowsDeleted {
                    register_number: register_number.to_string(),
                });
                Ok(deleted)
            }
            Err(source) => {
                error!("Error deleting student {}: {}", register_number, source);
                self.notifier.error(DELETE_FAILURE_MESSAGE);
                Err(AttendanceError::DeleteFailure {
                    register_number: register_number.to_string(),
                    source,
                })
            }
        }
    }

    /// Tabular form of the rows currently displayed, unsaved edits included
    pub fn export_table(&self) -> ExportTable {
        ExportTable::from_rows(self.state.period, &self.state.rows)
    }

    /// Export through the table's own exporter
    pub fn export(&self) -> Result<PathBuf, AttendanceError> {
        self.export_to_file(self.exporter.as_ref())
    }

    /// Write `Attendance_<month>_<year>.<ext>` through the exporter
    pub fn export_to_file(&self, exporter: &dyn FileExporter) -> Result<PathBuf, AttendanceError> {
        let table = self.export_table();
        let filename = table.file_name(exporter.extension());

        match exporter.write(&table, &filename) {
            Ok(path) => {
                info!("Exported {} attendance rows to {}", table.rows.len(), path.display());
                Ok(path)
            }
            Err(e) => {
                error!("Error exporting attendance to {}: {}", filename, e);
                self.notifier.error(EXPORT_FAILURE_MESSAGE);
                Err(AttendanceError::ExportFailure(e))
            }
        }
    }
}
