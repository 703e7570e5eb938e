//! In-memory collaborators for exercising the attendance table in tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use shared::{AttendancePeriod, AttendanceRecord, RecordId};

use crate::error::StoreError;
use crate::services::notifier::Notifier;
use crate::services::store::RecordStore;

/// Record store backed by a map, with switchable failures and call counters
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<AttendancePeriod, Vec<AttendanceRecord>>>,
    fail_list: Mutex<bool>,
    fail_save: Mutex<bool>,
    fail_delete: Mutex<bool>,
    pub list_calls: AtomicU32,
    pub save_calls: AtomicU32,
    pub delete_calls: AtomicU32,
    next_id: AtomicU32,
}

impl MemoryStore {
    pub fn with_records(period: AttendancePeriod, records: Vec<AttendanceRecord>) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(period, records);
        store
    }

    pub fn records(&self, period: AttendancePeriod) -> Vec<AttendanceRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&period)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    pub fn set_fail_save(&self, fail: bool) {
        *self.fail_save.lock().unwrap() = fail;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        *self.fail_delete.lock().unwrap() = fail;
    }
}

fn failure() -> StoreError {
    StoreError::Http { status: 500, message: "Internal Server Error".to_string() }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, period: AttendancePeriod) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_list.lock().unwrap() {
            return Err(failure());
        }
        Ok(self.records(period))
    }

    async fn save(
        &self,
        period: AttendancePeriod,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_save.lock().unwrap() {
            return Err(failure());
        }
        let saved: Vec<AttendanceRecord> = records
            .iter()
            .cloned()
            .map(|mut record| {
                if record.id.is_none() {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    record.id = Some(RecordId(format!("mem::{}", n)));
                }
                record
            })
            .collect();
        self.records.lock().unwrap().insert(period, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, register_number: &str) -> Result<u32, StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_delete.lock().unwrap() {
            return Err(failure());
        }
        let mut removed = 0;
        for records in self.records.lock().unwrap().values_mut() {
            let before = records.len();
            records.retain(|r| r.reg_number != register_number);
            removed += (before - records.len()) as u32;
        }
        Ok(removed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Notifier that remembers every notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Error(message.to_string()));
    }
}
