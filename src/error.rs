//! Error types for Solidafy JSON
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for Solidafy JSON
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Sampling ratio must be greater than 0, got {ratio}")]
    InvalidSamplingRatio { ratio: f64 },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Duplicate field '{name}' in schema")]
    DuplicateSchemaField { name: String },

    // ============================================================================
    // Codec Errors
    // ============================================================================
    #[error("Failed to decode {token_kind} token as {target_type}")]
    Decode {
        token_kind: String,
        target_type: String,
    },

    #[error("Failed to encode {value_kind} value as {declared_type}")]
    Encode {
        value_kind: String,
        declared_type: String,
    },

    #[error("Cannot parse '{literal}' as {target}")]
    NumericLiteral { literal: String, target: String },

    #[error("Cannot parse '{literal}' as {target}")]
    TemporalLiteral { literal: String, target: String },

    #[error("Value '{literal}' does not fit decimal({precision},{scale})")]
    DecimalOverflow {
        literal: String,
        precision: u8,
        scale: u8,
    },

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    // ============================================================================
    // Arrow Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateSchemaField { name: name.into() }
    }

    /// Create a decode error for an unsupported token/type pairing
    pub fn decode(token_kind: impl ToString, target_type: impl ToString) -> Self {
        Self::Decode {
            token_kind: token_kind.to_string(),
            target_type: target_type.to_string(),
        }
    }

    /// Create an encode error for a value that does not match its declared type
    pub fn encode(value_kind: impl ToString, declared_type: impl ToString) -> Self {
        Self::Encode {
            value_kind: value_kind.to_string(),
            declared_type: declared_type.to_string(),
        }
    }

    /// Create a numeric literal error
    pub fn numeric_literal(literal: impl Into<String>, target: impl ToString) -> Self {
        Self::NumericLiteral {
            literal: literal.into(),
            target: target.to_string(),
        }
    }

    /// Create a temporal literal error
    pub fn temporal_literal(literal: impl Into<String>, target: impl ToString) -> Self {
        Self::TemporalLiteral {
            literal: literal.into(),
            target: target.to_string(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single record
    ///
    /// Record-level errors leave the shared schema untouched, so callers can
    /// skip the record and keep consuming the sequence.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. }
                | Error::Encode { .. }
                | Error::NumericLiteral { .. }
                | Error::TemporalLiteral { .. }
                | Error::DecimalOverflow { .. }
                | Error::Base64(_)
        )
    }
}

/// Result type alias for Solidafy JSON
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
