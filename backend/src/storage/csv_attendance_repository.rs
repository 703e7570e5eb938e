use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{Reader, Writer};
use shared::AttendancePeriod;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::{debug, info};

use super::connection::CsvConnection;
use super::traits::AttendanceStorage;
use crate::domain::models::AttendanceEntry;

/// CSV-based attendance repository: one file holding every period
#[derive(Debug, Clone)]
pub struct CsvAttendanceRepository {
    connection: CsvConnection,
}

impl CsvAttendanceRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every stored entry; a missing file means no entries yet
    fn read_entries(&self) -> Result<Vec<AttendanceEntry>> {
        let file_path = self.connection.attendance_file_path();
        if !file_path.exists() {
            debug!("Attendance file {} does not exist yet", file_path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut entries = Vec::new();
        for result in csv_reader.deserialize() {
            let entry: AttendanceEntry = result
                .with_context(|| format!("Malformed row in {}", file_path.display()))?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Write all entries through a temporary file and an atomic rename
    fn write_entries(&self, entries: &[AttendanceEntry]) -> Result<()> {
        let file_path = self.connection.attendance_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for entry in entries {
                csv_writer.serialize(entry)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

#[async_trait]
impl AttendanceStorage for CsvAttendanceRepository {
    async fn list_entries(&self, period: AttendancePeriod) -> Result<Vec<AttendanceEntry>> {
        let entries = self
            .read_entries()?
            .into_iter()
            .filter(|entry| entry.period() == period)
            .collect::<Vec<_>>();
        debug!("Read {} entries for {}", entries.len(), period);
        Ok(entries)
    }

    async fn upsert_entries(&self, entries: &[AttendanceEntry]) -> Result<()> {
        let mut stored = self.read_entries()?;

        for entry in entries {
            match stored.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry.clone(),
                None => stored.push(entry.clone()),
            }
        }

        self.write_entries(&stored)?;
        info!("Upserted {} attendance entries", entries.len());
        Ok(())
    }

    async fn delete_by_register_number(&self, register_number: &str) -> Result<u32> {
        let mut stored = self.read_entries()?;
        let before = stored.len();
        stored.retain(|entry| entry.reg_number != register_number);
        let removed = (before - stored.len()) as u32;

        if removed > 0 {
            self.write_entries(&stored)?;
        }
        info!("Deleted {} entries for register number {}", removed, register_number);
        Ok(removed)
    }
}
