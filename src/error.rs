// src/error.rs

use std::fmt;

/// Global Client Error Enum.
/// Every failure a view can run into ends up here, and `Display` yields the
/// message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    // Transport failure (connection refused, timeout, DNS)
    Network(String),

    // Non-2xx response from the backend
    Api { status: u16, message: String },

    // Success response whose payload could not be decoded
    Decode(String),

    // Local key-value store failure
    Storage(String),

    // Rejected locally before any request was made
    Validation(String),

    NotFound(String),

    // Missing or invalid environment configuration
    Config(String),
}

impl AppError {
    /// HTTP status of a backend rejection, if this error is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Api { message, .. } => write!(f, "{}", message),
            AppError::Decode(msg) => write!(f, "Unexpected response from server: {}", msg),
            AppError::Storage(msg) => write!(f, "Local storage error: {}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts transport-level `reqwest::Error` into `AppError::Network`.
/// Allows using `?` operator on `send()` and body reads.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
