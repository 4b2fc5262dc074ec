mod config;
pub mod profile;
pub mod tab;

pub use config::{Config, EngagementConfig, SurveyConfig, TimerConfig};
pub use profile::{ProfileDb, SessionSummary};
pub use tab::{TabRecord, TabStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/intently[-dev]/` based on INTENTLY_ENV.
///
/// Set INTENTLY_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("INTENTLY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("intently-dev")
    } else {
        base_dir.join("intently")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
