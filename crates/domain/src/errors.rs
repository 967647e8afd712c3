//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for VSME reporting
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum VsmeError {
    /// No emission factor (or stored document) matches the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input shape, unit or range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arithmetic that cannot produce a meaningful emission figure
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// Transient failure persisting data remotely; safe to retry
    #[error("Save failed: {0}")]
    SaveFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VsmeError {
    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SaveFailure(_) | Self::Network(_) | Self::Storage(_))
    }

    /// Message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Calculation(msg)
            | Self::SaveFailure(msg)
            | Self::Storage(msg)
            | Self::Network(msg)
            | Self::Config(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for VSME operations
pub type Result<T> = std::result::Result<T, VsmeError>;
