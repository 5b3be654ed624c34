use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the dashboard crates outside the network layer.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The analysis CSV export is malformed.
    #[error("Invalid analysis CSV at line {line}: {message}")]
    CsvParse { line: usize, message: String },
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = DashboardError::FileWrite {
            path: PathBuf::from("/exports/ai_analysis_log.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("/exports/ai_analysis_log.csv"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_error_display_csv_parse() {
        let err = DashboardError::CsvParse {
            line: 7,
            message: "unterminated quoted field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid analysis CSV at line 7: unterminated quoted field"
        );
    }
}
