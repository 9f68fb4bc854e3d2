//! Configuration Error Types
//!
//! Errors raised while loading or validating run configuration. Every variant is
//! fatal: a run with invalid configuration aborts before any batch work starts.

use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Batch size must be a positive integer
    #[error("Invalid batch size {batch_size}: batch_size must be a positive integer")]
    NonPositiveBatchSize { batch_size: i64 },

    /// Missing required configuration field
    #[error("Missing required configuration field '{field}' in {context}")]
    MissingRequiredField { field: String, context: String },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },

    /// Target range is not a valid A1 range
    #[error("Invalid target range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// Configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {error}")]
    Load { error: String },
}

impl ConfigurationError {
    /// Create a missing required field error
    pub fn missing_required_field<F: Into<String>, C: Into<String>>(field: F, context: C) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F: Into<String>, V: Into<String>, C: Into<String>>(
        field: F,
        value: V,
        context: C,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }

    /// Create an invalid range error
    pub fn invalid_range<R: Into<String>, S: Into<String>>(range: R, reason: S) -> Self {
        Self::InvalidRange {
            range: range.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        Self::Load {
            error: error.to_string(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
