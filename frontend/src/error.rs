//! Error types for the attendance table and its collaborators

use shared::AttendancePeriod;
use thiserror::Error;

/// Failure reported by a record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or protocol failure, including timeouts
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Server error {status}: {message}")]
    Http { status: u16, message: String },

    /// The store answered with a body that is not the expected JSON
    #[error("Invalid response from record store: {0}")]
    Decode(#[source] reqwest::Error),
}

impl StoreError {
    pub async fn from_response(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        StoreError::Http { status, message }
    }
}

/// Failure writing an export file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Failure of a table operation, caught at the operation boundary
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Failed to load attendance for {period}: {source}")]
    LoadFailure {
        period: AttendancePeriod,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save attendance for {period}: {source}")]
    SaveFailure {
        period: AttendancePeriod,
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete student {register_number}: {source}")]
    DeleteFailure {
        register_number: String,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    ValidationFailure(String),

    #[error("Failed to export attendance: {0}")]
    ExportFailure(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AttendanceError::LoadFailure {
            period: AttendancePeriod::new(3, 2025),
            source: StoreError::Http { status: 500, message: "boom".to_string() },
        };
        assert_eq!(err.to_string(), "Failed to load attendance for 3/2025: Server error 500: boom");

        let err = AttendanceError::DeleteFailure {
            register_number: "R1".to_string(),
            source: StoreError::Http { status: 404, message: "no records".to_string() },
        };
        assert_eq!(err.to_string(), "Failed to delete student R1: Server error 404: no records");
    }
}
