//! # Record Store
//!
//! The persistence collaborator the attendance table talks to. The table only
//! depends on this trait; [`super::api::ApiClient`] is the HTTP implementation.

use async_trait::async_trait;
use shared::{AttendancePeriod, AttendanceRecord};

use crate::error::StoreError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read all records for a period
    async fn list(&self, period: AttendancePeriod) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Replace or append the records of a period.
    ///
    /// Returns the stored records in the order they were sent, each carrying
    /// its server-assigned ID.
    async fn save(
        &self,
        period: AttendancePeriod,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Remove records by register number, returning how many were removed
    async fn delete(&self, register_number: &str) -> Result<u32, StoreError>;
}
