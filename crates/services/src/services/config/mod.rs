//! Profile configuration schema
//!
//! Defines the on-disk profile config, its browser-safe projection, field-level
//! validation, and JSON file helpers.

pub mod types;
pub mod validation;

use std::path::Path;

use thiserror::Error;
pub use types::*;
pub use validation::validate_config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and parse a profile config file
pub async fn load_config_from_file(path: &Path) -> Result<ProfileConfig, ConfigError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write a profile config file as pretty JSON, creating parent directories as needed
pub async fn save_config_to_file(config: &ProfileConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let raw = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, raw).await?;
    Ok(())
}
