//! Error types for Towercast

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TowercastError {
    // Coverage errors
    #[error("Failed to allocate coverage output in {dir}: {source}")]
    OutputAllocation {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {reason}")]
    ProcessLaunch { program: PathBuf, reason: String },

    // Market errors
    #[error("Request carries no usable geometry. Provide 'coordinates' or 'geojson'")]
    MissingGeometry,

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TowercastError>;
