//! Spreadsheet export of the attendance table.
//!
//! The export is a pure local transformation of whatever rows are currently
//! displayed, unsaved edits included. [`ExportTable`] holds the tabular form;
//! a [`FileExporter`] encodes it and writes the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::AttendancePeriod;
use tracing::info;

use crate::error::ExportError;
use crate::services::xlsx;
use crate::state::AttendanceRow;

/// Column headers of the exported sheet, in order
pub const EXPORT_HEADERS: [&str; 7] = [
    "Month",
    "Year",
    "Register Number",
    "Name",
    "Total Classes",
    "Total Attended",
    "Attendance (%)",
];

/// Sheet name used inside workbooks
pub const SHEET_NAME: &str = "Attendance";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(i64),
    Empty,
}

impl Cell {
    fn from_count(count: Option<u32>) -> Self {
        count.map_or(Cell::Empty, |n| Cell::Number(i64::from(n)))
    }

    /// Plain-text rendering, used by the CSV encoder
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// Tabular form of the attendance table
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub period: AttendancePeriod,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    pub fn from_rows(period: AttendancePeriod, rows: &[AttendanceRow]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                vec![
                    Cell::Number(i64::from(period.month)),
                    Cell::Number(i64::from(period.year)),
                    Cell::Text(row.register_number.clone()),
                    Cell::Text(row.name.clone()),
                    Cell::from_count(row.total_classes),
                    Cell::from_count(row.attended),
                    Cell::Text(row.percentage()),
                ]
            })
            .collect();

        Self {
            period,
            headers: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// File name following `Attendance_<month>_<year>.<ext>`
    pub fn file_name(&self, extension: &str) -> String {
        format!("Attendance_{}_{}.{}", self.period.month, self.period.year, extension)
    }
}

/// Supported export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

/// Writes an [`ExportTable`] to a file
pub trait FileExporter: Send + Sync {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Encode the table into the file's bytes
    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError>;

    /// Directory files are written into
    fn output_dir(&self) -> &Path;

    /// Encode the table and write it as `filename` under the output directory
    fn write(&self, table: &ExportTable, filename: &str) -> Result<PathBuf, ExportError> {
        let bytes = self.encode(table)?;
        let dir = self.output_dir();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(filename);
        fs::write(&path, &bytes)?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Build the exporter for a configured format
pub fn exporter_for(format: ExportFormat, output_dir: impl Into<PathBuf>) -> Box<dyn FileExporter> {
    match format {
        ExportFormat::Xlsx => Box::new(XlsxExporter::new(output_dir)),
        ExportFormat::Csv => Box::new(CsvExporter::new(output_dir)),
    }
}

/// Single-sheet Office Open XML workbook exporter
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    output_dir: PathBuf,
}

impl XlsxExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

impl FileExporter for XlsxExporter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        xlsx::write_workbook(SHEET_NAME, &table.headers, &table.rows)
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

impl FileExporter for CsvExporter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(Cell::as_text))?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
