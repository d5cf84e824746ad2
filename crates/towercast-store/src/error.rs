use thiserror::Error;
use towercast_core::models::ErrorCode;

use crate::postgres::ConfigError;

/// Failures reported by a SQL executor
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Database configuration invalid: {0}")]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Code reported in the market response body
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StoreError::Connection(_) | StoreError::Config(_) => ErrorCode::ConnectionFailure,
            StoreError::Query(_) => ErrorCode::QueryFailure,
        }
    }
}
