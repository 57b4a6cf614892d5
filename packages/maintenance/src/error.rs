//! Error types for archive maintenance.
//!
//! Most failures here are per-archive: the maintenance loops report them,
//! skip the archive and continue. The one run-fatal condition is a missing
//! archiver binary — it cannot succeed for any later archive either, so the
//! run stops immediately.

use thiserror::Error;

/// Main error type for the maintenance library.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive error.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// External archiver binary is absent. Fatal to the whole run.
    #[error("archiver '{0}' not found on PATH")]
    ArchiverNotFound(String),

    /// External archiver ran and exited non-zero. Skips one archive.
    #[error("archiver failed on {archive} (exit {code:?}): {stderr}")]
    ArchiverFailed {
        archive: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Malformed line in a tab-separated entry list file.
    #[error("invalid entry list line {line}: '{text}'")]
    InvalidListLine { line: usize, text: String },

    /// Catalog export record without the provenance fields.
    #[error("catalog record on line {line} is missing provenance fields")]
    MissingProvenance { line: usize },

    /// JSON parse error in a catalog export.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for maintenance operations.
pub type Result<T> = std::result::Result<T, MaintenanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archiver_not_found_display() {
        let err = MaintenanceError::ArchiverNotFound("7z".to_string());
        assert_eq!(err.to_string(), "archiver '7z' not found on PATH");
    }

    #[test]
    fn test_archiver_failed_display() {
        let err = MaintenanceError::ArchiverFailed {
            archive: "lib1.zip".to_string(),
            code: Some(2),
            stderr: "cannot open".to_string(),
        };
        assert!(err.to_string().contains("lib1.zip"));
        assert!(err.to_string().contains("cannot open"));
    }
}
