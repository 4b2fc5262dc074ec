//! Core error types for intently-core.
//!
//! Failure taxonomy: storage errors are recoverable (callers fall back to
//! in-memory defaults), validation errors are rejected synchronously, and
//! survey errors are logged and discarded. Nothing in this crate is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intently-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-access errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Survey submission errors
    #[error("Survey error: {0}")]
    Survey(#[from] SurveyError),
}

/// Storage-specific errors.
///
/// These are never surfaced to the user: the widget logs them and degrades
/// to non-persistent, in-memory operation for the rest of the session.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the profile database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Failed to read a persisted record
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a persisted record
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted record exists but cannot be parsed
    #[error("Corrupt record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory cannot be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Validation errors.
///
/// Rejected synchronously; the caller must not proceed to persist.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// NPS score outside the 0-10 band
    #[error("NPS score must be between 0 and 10 (got {score})")]
    ScoreOutOfRange { score: i32 },

    /// Session duration must be a positive number of minutes
    #[error("Invalid session duration: {minutes} minutes")]
    InvalidDuration { minutes: u64 },
}

/// Survey submission errors.
///
/// Fully isolated from local state: logged, never propagated, never retried.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// The configured endpoint is not a valid URL
    #[error("Invalid survey endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport-level failure
    #[error("Survey request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Survey endpoint returned HTTP {0}")]
    Status(u16),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
