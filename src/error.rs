//! Error types for chatsweep
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chatsweep operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, chat-service interactions, and export writing.
#[derive(Error, Debug)]
pub enum ChatsweepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat-service errors (API calls, unexpected payloads, etc.)
    #[error("Service error: {0}")]
    Service(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Export writing errors
    #[error("Export error: {0}")]
    Export(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for chatsweep operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
