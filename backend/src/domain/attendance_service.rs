//! # Attendance Service
//!
//! Business rules for the record store: period validation, upsert matching
//! and deletion by register number. Storage is reached only through
//! [`AttendanceStorage`].
//!
//! Saving a period matches each incoming record against the stored entries
//! of that period, in this order:
//! 1. by `_id`, when the ID belongs to an entry of the period
//! 2. by non-empty register number
//! 3. otherwise a new entry with a freshly generated ID
//!
//! A stored entry is claimed by at most one incoming record per save.

use std::collections::HashSet;
use std::sync::Arc;

use shared::{AttendancePeriod, AttendanceRecord, PeriodError, RecordId};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::models::AttendanceEntry;
use crate::storage::AttendanceStorage;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    #[error("No attendance records found for register number {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct AttendanceService {
    storage: Arc<dyn AttendanceStorage>,
    write_lock: Arc<Mutex<()>>,
}

impl AttendanceService {
    pub fn new(storage: Arc<dyn AttendanceStorage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Records of one period. An out-of-range month simply has no records.
    pub async fn list_records(
        &self,
        period: AttendancePeriod,
    ) -> Result<Vec<AttendanceRecord>, ServiceError> {
        if !period.is_valid() {
            warn!("Listing attendance for invalid period {}", period);
            return Ok(Vec::new());
        }

        let entries = self.storage.list_entries(period).await?;
        Ok(entries.iter().map(AttendanceEntry::to_record).collect())
    }

    /// Upsert the records of one period; returns them stored, in request order
    pub async fn save_records(
        &self,
        period: AttendancePeriod,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let period = period.validated()?;

        let _guard = self.write_lock.lock().await;
        let existing = self.storage.list_entries(period).await?;

        let mut claimed: HashSet<RecordId> = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let id = match_existing(&existing, &claimed, record).unwrap_or_else(RecordId::generate);
            claimed.insert(id.clone());
            entries.push(AttendanceEntry::from_record(id, period, record));
        }

        self.storage.upsert_entries(&entries).await?;
        info!("Saved {} attendance records for {}", entries.len(), period);

        Ok(entries.iter().map(AttendanceEntry::to_record).collect())
    }

    /// Delete every record with this register number across all periods
    pub async fn delete_by_register_number(&self, register_number: &str) -> Result<u32, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.storage.delete_by_register_number(register_number).await?;

        if removed == 0 {
            return Err(ServiceError::NotFound(register_number.to_string()));
        }
        info!("Deleted {} records for register number {}", removed, register_number);
        Ok(removed)
    }
}

fn match_existing(
    existing: &[AttendanceEntry],
    claimed: &HashSet<RecordId>,
    record: &AttendanceRecord,
) -> Option<RecordId> {
    let unclaimed = || existing.iter().filter(|entry| !claimed.contains(&entry.id));

    if let Some(id) = &record.id {
        if let Some(entry) = unclaimed().find(|entry| &entry.id == id) {
            return Some(entry.id.clone());
        }
        warn!("Ignoring unknown record id {}", id);
    }

    if record.reg_number.is_empty() {
        return None;
    }
    unclaimed()
        .find(|entry| entry.reg_number == record.reg_number)
        .map(|entry| entry.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CsvAttendanceRepository, CsvConnection};
    use tempfile::{tempdir, TempDir};

    fn setup_test() -> (AttendanceService, TempDir) {
        let temp_dir = tempdir().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let storage = Arc::new(CsvAttendanceRepository::new(connection));
        (AttendanceService::new(storage), temp_dir)
    }

    fn record(reg: &str, name: &str, total: Option<u32>, attended: Option<u32>) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            reg_number: reg.to_string(),
            name: name.to_string(),
            total_classes: total,
            attended,
        }
    }

    fn march() -> AttendancePeriod {
        AttendancePeriod::new(3, 2025)
    }

    #[tokio::test]
    async fn test_save_assigns_ids_in_request_order() {
        let (service, _temp_dir) = setup_test();

        let saved = service
            .save_records(
                march(),
                &[record("R1", "Alice", Some(20), Some(18)), record("R2", "Bob", Some(20), Some(10))],
            )
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].reg_number, "R1");
        assert_eq!(saved[1].reg_number, "R2");
        assert!(saved.iter().all(|r| r.id.is_some()));
        assert_ne!(saved[0].id, saved[1].id);

        let listed = service.list_records(march()).await.unwrap();
        assert_eq!(listed, saved);
    }

    #[tokio::test]
    async fn test_repeated_save_does_not_duplicate() {
        let (service, _temp_dir) = setup_test();
        let first = service
            .save_records(march(), &[record("R1", "Alice", Some(20), Some(18))])
            .await
            .unwrap();

        let mut updated = first[0].clone();
        updated.attended = Some(19);
        let second = service.save_records(march(), &[updated]).await.unwrap();

        assert_eq!(second[0].id, first[0].id);
        let listed = service.list_records(march()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].attended, Some(19));
    }

    #[tokio::test]
    async fn test_save_without_id_matches_register_number() {
        let (service, _temp_dir) = setup_test();
        let first = service
            .save_records(march(), &[record("R1", "Alice", Some(20), Some(18))])
            .await
            .unwrap();

        let second = service
            .save_records(march(), &[record("R1", "Alice B.", Some(20), Some(20))])
            .await
            .unwrap();

        assert_eq!(second[0].id, first[0].id);
        let listed = service.list_records(march()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Alice B.");
    }

    #[tokio::test]
    async fn test_blank_register_numbers_are_distinct_rows() {
        let (service, _temp_dir) = setup_test();
        service
            .save_records(march(), &[record("", "", None, None), record("", "", None, None)])
            .await
            .unwrap();
        service.save_records(march(), &[record("", "", None, None)]).await.unwrap();

        assert_eq!(service.list_records(march()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_same_register_number_in_other_period_is_separate() {
        let (service, _temp_dir) = setup_test();
        let april = AttendancePeriod::new(4, 2025);
        let first = service
            .save_records(march(), &[record("R1", "Alice", Some(20), Some(18))])
            .await
            .unwrap();
        let second = service
            .save_records(april, &[record("R1", "Alice", Some(22), Some(22))])
            .await
            .unwrap();

        assert_ne!(first[0].id, second[0].id);
        assert_eq!(service.list_records(march()).await.unwrap()[0].attended, Some(18));
        assert_eq!(service.list_records(april).await.unwrap()[0].attended, Some(22));
    }

    #[tokio::test]
    async fn test_unknown_id_falls_back_to_new_entry() {
        let (service, _temp_dir) = setup_test();
        let mut stray = record("R9", "Zed", Some(1), Some(1));
        stray.id = Some(RecordId::from("attendance::missing"));

        let saved = service.save_records(march(), &[stray]).await.unwrap();

        assert_ne!(saved[0].id, Some(RecordId::from("attendance::missing")));
        assert_eq!(service.list_records(march()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_month() {
        let (service, _temp_dir) = setup_test();
        let result = service
            .save_records(AttendancePeriod::new(13, 2025), &[record("R1", "Alice", None, None)])
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidPeriod(PeriodError::MonthOutOfRange(13)))));
    }

    #[tokio::test]
    async fn test_list_invalid_month_is_empty() {
        let (service, _temp_dir) = setup_test();
        let listed = service.list_records(AttendancePeriod::new(0, 2025)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_register_number() {
        let (service, _temp_dir) = setup_test();
        service
            .save_records(march(), &[record("R1", "Alice", None, None), record("R2", "Bob", None, None)])
            .await
            .unwrap();

        assert_eq!(service.delete_by_register_number("R1").await.unwrap(), 1);

        let listed = service.list_records(march()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reg_number, "R2");

        let missing = service.delete_by_register_number("R1").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(reg)) if reg == "R1"));
    }
}
