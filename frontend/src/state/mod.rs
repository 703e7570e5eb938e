pub mod row;
pub mod table_state;

pub use row::{coerce_count, AttendanceRow, CoercedCount, FieldValue, Identity, LocalId, RowField};
pub use table_state::{reduce, Action, TableState};
