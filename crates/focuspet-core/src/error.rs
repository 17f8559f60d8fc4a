//! Core error types for focuspet-core.
//!
//! Every failure in the core is recoverable: a rejected operation leaves the
//! session, task list and mood untouched and hands the reason back to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focuspet-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input (empty text, unknown ids)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Task creation past the free quota. Distinct from validation so the
    /// presentation layer can route it to the upgrade flow.
    #[error("Upgrade required: the free plan allows at most {limit} tasks")]
    QuotaExceeded { limit: usize },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("subtask text must not be empty")]
    EmptySubtaskText,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("subtask {subtask} not found in task {task}")]
    SubtaskNotFound { task: String, subtask: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home / data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl CoreError {
    /// True when the failure should send the user to the upgrade flow.
    pub fn is_upgrade_required(&self) -> bool {
        matches!(self, CoreError::QuotaExceeded { .. })
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_is_distinguishable_from_validation() {
        let quota = CoreError::QuotaExceeded { limit: 4 };
        let validation = CoreError::from(ValidationError::EmptyTitle);
        assert!(quota.is_upgrade_required());
        assert!(!validation.is_upgrade_required());
        assert!(quota.to_string().contains('4'));
    }
}
