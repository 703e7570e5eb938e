//! # Storage Traits
//!
//! Storage abstraction used by the attendance service, so the domain layer
//! does not depend on how records are persisted.

use anyhow::Result;
use async_trait::async_trait;
use shared::AttendancePeriod;

use crate::domain::models::AttendanceEntry;

#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    /// List the entries of one period in stored order
    async fn list_entries(&self, period: AttendancePeriod) -> Result<Vec<AttendanceEntry>>;

    /// Insert entries, replacing any stored entry with the same ID
    async fn upsert_entries(&self, entries: &[AttendanceEntry]) -> Result<()>;

    /// Delete every entry with this register number, across all periods.
    /// Returns the number of entries removed.
    async fn delete_by_register_number(&self, register_number: &str) -> Result<u32>;
}
