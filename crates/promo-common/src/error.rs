//! Error types for promostore

use thiserror::Error;

/// Result type alias for promostore operations
pub type Result<T> = std::result::Result<T, PromoError>;

/// Main error type for promostore
#[derive(Error, Debug)]
pub enum PromoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Promotion not found: {0}")]
    NotFound(String),
}
