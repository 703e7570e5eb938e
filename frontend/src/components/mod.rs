pub mod attendance_table;

pub use attendance_table::AttendanceTable;
