//! Domain error types
//!
//! This module defines the error hierarchy for nerscrub.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main nerscrub error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum NerScrubError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// NER backend errors (server, subprocess, model installation)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Tagged tokens could not be aligned with the source text
    #[error("Offset recovery error: {0}")]
    OffsetRecovery(#[from] OffsetRecoveryError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// NER backend errors
///
/// Errors that occur when talking to a tagging backend. These errors don't
/// expose the HTTP client or process types.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failed to connect to the backend server
    #[error("Failed to connect to NER server: {0}")]
    ConnectionFailed(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request or process timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Backend answered with something we cannot parse
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Model files or resources are not installed
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// External tagger process failed
    #[error("Tagger process failed: {0}")]
    ProcessFailed(String),
}

impl BackendError {
    /// Whether a retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::ServerError { .. } | Self::Timeout(_)
        )
    }
}

/// Raised when a token cannot be placed in the original text
///
/// This means the backend's tokenization drifted from the input (whitespace
/// or unicode normalization, for example). A span with wrong offsets is never
/// emitted in its place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot place token {token:?} at or after byte {cursor}: {reason}")]
pub struct OffsetRecoveryError {
    /// Token text as produced by the backend
    pub token: String,
    /// Search cursor (byte offset) when the failure happened
    pub cursor: usize,
    /// What went wrong
    pub reason: String,
}

impl OffsetRecoveryError {
    /// Creates a new offset recovery error
    pub fn new(token: impl Into<String>, cursor: usize, reason: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            cursor,
            reason: reason.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for NerScrubError {
    fn from(err: std::io::Error) -> Self {
        NerScrubError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for NerScrubError {
    fn from(err: serde_json::Error) -> Self {
        NerScrubError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for NerScrubError {
    fn from(err: toml::de::Error) -> Self {
        NerScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NerScrubError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_backend_error_conversion() {
        let backend_err = BackendError::ConnectionFailed("Network error".to_string());
        let err: NerScrubError = backend_err.into();
        assert!(matches!(err, NerScrubError::Backend(_)));
    }

    #[test]
    fn test_offset_recovery_error_conversion() {
        let offset_err = OffsetRecoveryError::new("York", 12, "token text not found");
        let err: NerScrubError = offset_err.clone().into();
        assert!(matches!(err, NerScrubError::OffsetRecovery(_)));
        assert!(err.to_string().contains("\"York\""));
        assert!(err.to_string().contains("byte 12"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(BackendError::Timeout("30s".to_string()).is_retryable());
        assert!(BackendError::ServerError {
            status: 503,
            message: "busy".to_string()
        }
        .is_retryable());
        assert!(!BackendError::ClientError {
            status: 400,
            message: "bad".to_string()
        }
        .is_retryable());
        assert!(!BackendError::ModelUnavailable("missing".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: NerScrubError = io_err.into();
        assert!(matches!(err, NerScrubError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: NerScrubError = json_err.into();
        assert!(matches!(err, NerScrubError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: NerScrubError = toml_err.into();
        assert!(matches!(err, NerScrubError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
