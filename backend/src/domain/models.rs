//! Domain model for stored attendance

use serde::{Deserialize, Serialize};
use shared::{AttendancePeriod, AttendanceRecord, RecordId};

/// One persisted attendance row, keyed by its record ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: RecordId,
    pub month: u32,
    pub year: i32,
    pub reg_number: String,
    pub name: String,
    pub total_classes: Option<u32>,
    pub attended: Option<u32>,
}

impl AttendanceEntry {
    pub fn from_record(id: RecordId, period: AttendancePeriod, record: &AttendanceRecord) -> Self {
        Self {
            id,
            month: period.month,
            year: period.year,
            reg_number: record.reg_number.clone(),
            name: record.name.clone(),
            total_classes: record.total_classes,
            attended: record.attended,
        }
    }

    pub fn period(&self) -> AttendancePeriod {
        AttendancePeriod::new(self.month, self.year)
    }

    pub fn to_record(&self) -> AttendanceRecord {
        AttendanceRecord {
            id: Some(self.id.clone()),
            reg_number: self.reg_number.clone(),
            name: self.name.clone(),
            total_classes: self.total_classes,
            attended: self.attended,
        }
    }
}
