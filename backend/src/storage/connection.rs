use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// CsvConnection manages the data directory that holds the attendance file
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            info!("Creating data directory {}", base_path.display());
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the CSV file holding every attendance entry
    pub fn attendance_file_path(&self) -> PathBuf {
        self.base_directory.join("attendance.csv")
    }
}
