//! # Attendance Row
//!
//! The editable row as held by the table, plus the coercion rules applied to
//! numeric cell input.

use std::collections::BTreeSet;
use std::fmt;

use shared::{percentage_for_counts, AttendanceRecord, RecordId};

/// Client-only key assigned to a row before it has been persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u64);

/// Row identity: either a temporary client key or the record store's ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Local(LocalId),
    Persisted(RecordId),
}

impl Identity {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Identity::Persisted(_))
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            Identity::Persisted(id) => Some(id),
            Identity::Local(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Local(LocalId(id)) => write!(f, "local::{}", id),
            Identity::Persisted(id) => write!(f, "{}", id),
        }
    }
}

/// Editable columns of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowField {
    RegisterNumber,
    Name,
    TotalClasses,
    Attended,
}

impl RowField {
    pub fn is_numeric(self) -> bool {
        matches!(self, RowField::TotalClasses | RowField::Attended)
    }
}

/// Value typed into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Count(value)
    }
}

/// Result of coercing numeric cell input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercedCount {
    pub value: Option<u32>,
    /// False when the input was not a non-negative integer and got clamped to 0
    pub valid: bool,
}

/// Coerce numeric cell input.
///
/// Empty input clears the cell. A non-negative integer is kept. Anything else
/// (negative numbers, fractions, words, overflow) is clamped to 0 and marked
/// invalid.
pub fn coerce_count(input: &FieldValue) -> CoercedCount {
    match input {
        FieldValue::Count(n) => CoercedCount { value: Some(*n), valid: true },
        FieldValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return CoercedCount { value: None, valid: true };
            }
            match trimmed.parse::<u32>() {
                Ok(n) => CoercedCount { value: Some(n), valid: true },
                Err(_) => CoercedCount { value: Some(0), valid: false },
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRow {
    pub identity: Identity,
    pub register_number: String,
    pub name: String,
    pub total_classes: Option<u32>,
    pub attended: Option<u32>,
    /// Numeric fields whose last input was clamped
    pub invalid_fields: BTreeSet<RowField>,
}

impl AttendanceRow {
    /// A blank row keyed by a temporary identity
    pub fn blank(local_id: LocalId) -> Self {
        Self {
            identity: Identity::Local(local_id),
            register_number: String::new(),
            name: String::new(),
            total_classes: None,
            attended: None,
            invalid_fields: BTreeSet::new(),
        }
    }

    /// Build a row from a record returned by the store.
    ///
    /// Records without an `_id` get a local identity from `fallback`, which
    /// is only called for them.
    pub fn from_record(record: AttendanceRecord, fallback: impl FnOnce() -> LocalId) -> Self {
        let identity = match record.id {
            Some(id) => Identity::Persisted(id),
            None => Identity::Local(fallback()),
        };
        Self {
            identity,
            register_number: record.reg_number,
            name: record.name,
            total_classes: record.total_classes,
            attended: record.attended,
            invalid_fields: BTreeSet::new(),
        }
    }

    pub fn to_record(&self) -> AttendanceRecord {
        AttendanceRecord {
            id: self.identity.record_id().cloned(),
            reg_number: self.register_number.clone(),
            name: self.name.clone(),
            total_classes: self.total_classes,
            attended: self.attended,
        }
    }

    /// Return a copy with one field replaced; identity and other fields are kept
    pub fn with_field(&self, field: RowField, value: FieldValue) -> Self {
        let mut row = self.clone();
        match field {
            RowField::RegisterNumber => row.register_number = text_of(value),
            RowField::Name => row.name = text_of(value),
            RowField::TotalClasses | RowField::Attended => {
                let coerced = coerce_count(&value);
                if field == RowField::TotalClasses {
                    row.total_classes = coerced.value;
                } else {
                    row.attended = coerced.value;
                }
                if coerced.valid {
                    row.invalid_fields.remove(&field);
                } else {
                    row.invalid_fields.insert(field);
                }
            }
        }
        row
    }

    pub fn is_flagged(&self, field: RowField) -> bool {
        self.invalid_fields.contains(&field)
    }

    /// Derived attendance percentage, never stored
    pub fn percentage(&self) -> String {
        percentage_for_counts(self.attended, self.total_classes)
    }
}

fn text_of(value: FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text,
        FieldValue::Count(n) => n.to_string(),
    }
}
