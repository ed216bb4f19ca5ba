//! Error types for timeline-harvest
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for timeline-harvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Credentials error for '{path}': {message}")]
    Credentials { path: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Collection Errors
    // ============================================================================
    #[error("Transient fault: {message}")]
    TransientFault { message: String },

    #[error("Giving up after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: Box<Error> },

    #[error("Collection cancelled")]
    Cancelled,

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Storage error at '{path}': {message}")]
    Storage { path: String, message: String },

    #[error("State error: {message}")]
    State { message: String },

    #[error("Group error: {message}")]
    Group { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Notification failed: {message}")]
    Notify { message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Credentials {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a transient fault
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientFault {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a group error
    pub fn group(message: impl Into<String>) -> Self {
        Self::Group {
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
        }
    }

    /// Check if this error is a transient fault that may succeed on retry
    ///
    /// Request failures, unexpected statuses and malformed payloads are
    /// transient. Local I/O, configuration and exhausted retries are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::TransientFault { .. }
        )
    }

    /// Check if this error ends a run because the retry budget ran out
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RetryExhausted { .. })
    }
}

/// Result type alias for timeline-harvest
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
