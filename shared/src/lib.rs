use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use chrono::Datelike;
use uuid::Uuid;

/// Server-assigned identifier of a persisted attendance record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh record ID in format: "attendance::<uuid>"
    pub fn generate() -> Self {
        Self(format!("attendance::{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The (month, year) pair selecting which attendance collection is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendancePeriod {
    /// Month of the year, 1 = January
    pub month: u32,
    pub year: i32,
}

impl AttendancePeriod {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// Whether the month lies in 1..=12
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Validate the period, returning it unchanged when the month is in range
    pub fn validated(self) -> Result<Self, PeriodError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(PeriodError::MonthOutOfRange(self.month))
        }
    }
}

impl Default for AttendancePeriod {
    fn default() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }
}

impl fmt::Display for AttendancePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PeriodError {
    MonthOutOfRange(u32),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::MonthOutOfRange(month) => {
                write!(f, "Month must be between 1 and 12, got {}", month)
            }
        }
    }
}

impl std::error::Error for PeriodError {}

/// One student's attendance for a period, as exchanged with the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Absent until the record store has persisted the row
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub reg_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total_classes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub attended: Option<u32>,
}

impl AttendanceRecord {
    /// Attendance percentage formatted with two decimals
    pub fn percentage(&self) -> String {
        percentage_for_counts(self.attended, self.total_classes)
    }
}

/// Query parameters for GET /api/attendance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceQuery {
    pub month: u32,
    pub year: i32,
}

impl From<AttendancePeriod> for AttendanceQuery {
    fn from(period: AttendancePeriod) -> Self {
        Self {
            month: period.month,
            year: period.year,
        }
    }
}

impl From<AttendanceQuery> for AttendancePeriod {
    fn from(query: AttendanceQuery) -> Self {
        Self::new(query.month, query.year)
    }
}

/// Request body for POST /api/attendance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendanceRequest {
    pub month: u32,
    pub year: i32,
    pub attendance_data: Vec<AttendanceRecord>,
}

impl SaveAttendanceRequest {
    pub fn period(&self) -> AttendancePeriod {
        AttendancePeriod::new(self.month, self.year)
    }
}

/// Response after saving a period; `records` follow the request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendanceResponse {
    pub records: Vec<AttendanceRecord>,
    pub success_message: String,
}

/// Response after deleting by register number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttendanceResponse {
    pub register_number: String,
    pub deleted_count: u32,
    pub success_message: String,
}

/// Format `attended / total_classes * 100` with exactly two decimals.
///
/// Returns `"0.00"` when `total_classes` is zero, or when either operand is
/// not a finite non-negative number.
pub fn derive_percentage(attended: f64, total_classes: f64) -> String {
    let usable = |value: f64| value.is_finite() && value >= 0.0;
    if !usable(attended) || !usable(total_classes) || total_classes == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", attended / total_classes * 100.0)
}

/// Percentage for optional counts, empty counts being treated as 0
pub fn percentage_for_counts(attended: Option<u32>, total_classes: Option<u32>) -> String {
    derive_percentage(
        f64::from(attended.unwrap_or(0)),
        f64::from(total_classes.unwrap_or(0)),
    )
}

/// Accepts a number, a numeric string, an empty string or null.
///
/// Older clients post `""` for untouched cells and `null` for inputs that did
/// not parse.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n.trunc() as u64))
            .map(|n| n.min(u64::from(u32::MAX)) as u32),
        Some(serde_json::Value::String(text)) => text.trim().parse::<u32>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_percentage() {
        assert_eq!(derive_percentage(18.0, 20.0), "90.00");
        assert_eq!(derive_percentage(1.0, 3.0), "33.33");
        assert_eq!(derive_percentage(2.0, 3.0), "66.67");
        assert_eq!(derive_percentage(20.0, 20.0), "100.00");
        assert_eq!(derive_percentage(0.0, 7.0), "0.00");
    }

    #[test]
    fn test_derive_percentage_zero_total() {
        assert_eq!(derive_percentage(0.0, 0.0), "0.00");
        assert_eq!(derive_percentage(15.0, 0.0), "0.00");
        assert_eq!(percentage_for_counts(Some(15), None), "0.00");
        assert_eq!(percentage_for_counts(None, None), "0.00");
    }

    #[test]
    fn test_derive_percentage_non_finite_operands() {
        assert_eq!(derive_percentage(f64::NAN, 20.0), "0.00");
        assert_eq!(derive_percentage(10.0, f64::NAN), "0.00");
        assert_eq!(derive_percentage(f64::INFINITY, 20.0), "0.00");
        assert_eq!(derive_percentage(-1.0, 20.0), "0.00");
        assert_eq!(derive_percentage(5.0, -20.0), "0.00");
    }

    #[test]
    fn test_empty_attended_counts_as_zero() {
        assert_eq!(percentage_for_counts(None, Some(20)), "0.00");
        assert_eq!(percentage_for_counts(Some(18), Some(20)), "90.00");
    }

    #[test]
    fn test_period_validation() {
        assert!(AttendancePeriod::new(1, 2024).is_valid());
        assert!(AttendancePeriod::new(12, 2024).is_valid());
        assert!(!AttendancePeriod::new(0, 2024).is_valid());
        assert!(!AttendancePeriod::new(13, 2024).is_valid());

        let err = AttendancePeriod::new(13, 2024).validated().unwrap_err();
        assert_eq!(err, PeriodError::MonthOutOfRange(13));
        assert_eq!(err.to_string(), "Month must be between 1 and 12, got 13");
    }

    #[test]
    fn test_default_period_is_valid() {
        assert!(AttendancePeriod::default().is_valid());
    }

    #[test]
    fn test_record_id_generation() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert!(a.as_str().starts_with("attendance::"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_wire_format() {
        let record = AttendanceRecord {
            id: Some(RecordId::from("abc")),
            reg_number: "R1".to_string(),
            name: "Asha".to_string(),
            total_classes: Some(20),
            attended: Some(18),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "abc",
                "regNumber": "R1",
                "name": "Asha",
                "totalClasses": 20,
                "attended": 18
            })
        );
    }

    #[test]
    fn test_record_accepts_loose_counts() {
        let json = r#"[
            {"regNumber": "R1", "name": "A", "totalClasses": "", "attended": null},
            {"regNumber": "R2", "name": "B", "totalClasses": "20", "attended": 18.0},
            {"regNumber": "R3"}
        ]"#;
        let records: Vec<AttendanceRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].total_classes, None);
        assert_eq!(records[0].attended, None);
        assert_eq!(records[1].total_classes, Some(20));
        assert_eq!(records[1].attended, Some(18));
        assert_eq!(records[2].name, "");
        assert_eq!(records[2].id, None);
    }

    #[test]
    fn test_save_request_uses_camel_case_field_names() {
        let request = SaveAttendanceRequest {
            month: 3,
            year: 2025,
            attendance_data: Vec::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"month": 3, "year": 2025, "attendanceData": []}));
        assert_eq!(request.period(), AttendancePeriod::new(3, 2025));
    }
}
