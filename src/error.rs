//! Unified error handling for the migration-map library.
//!
//! The pipeline itself never fails: invalid records are skipped, an empty
//! input yields an empty result, and a missing keyword match is just
//! `AnimalClass::Unknown`. The error type exists for the boundaries around
//! the core, fetching records over HTTP and writing the rendered map.

use std::fmt;

/// Unified error type for migration-map operations.
#[derive(Debug, Clone)]
pub enum MigrationMapError {
    /// A record is missing or has unusable coordinates/identity.
    /// Diagnostic only: the pipeline skips such records instead of failing.
    InvalidRecord {
        individual_id: String,
        message: String,
    },
    /// Fetching records from the remote source failed
    FetchError {
        message: String,
        status_code: Option<u16>,
    },
    /// Writing the rendered map failed
    RenderError { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Generic internal error
    Internal { message: String },
}

impl fmt::Display for MigrationMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationMapError::InvalidRecord {
                individual_id,
                message,
            } => {
                write!(f, "Invalid record for '{}': {}", individual_id, message)
            }
            MigrationMapError::FetchError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Fetch error ({}): {}", code, message)
                } else {
                    write!(f, "Fetch error: {}", message)
                }
            }
            MigrationMapError::RenderError { message } => {
                write!(f, "Render error: {}", message)
            }
            MigrationMapError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            MigrationMapError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for MigrationMapError {}

/// Result type alias for migration-map operations.
pub type Result<T> = std::result::Result<T, MigrationMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationMapError::InvalidRecord {
            individual_id: "tern_001".to_string(),
            message: "latitude is not finite".to_string(),
        };
        assert!(err.to_string().contains("tern_001"));
        assert!(err.to_string().contains("latitude"));

        let err = MigrationMapError::FetchError {
            message: "timeout".to_string(),
            status_code: Some(504),
        };
        assert!(err.to_string().contains("504"));
    }
}
