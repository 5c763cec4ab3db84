//! Core error types for the archivist client library.
//!
//! This module defines the central error type shared by every crate in the
//! workspace. Each failure class is represented as a variant for clear
//! propagation across module boundaries. The library performs no automatic
//! retries; every failure is reported to the immediate caller.

use thiserror::Error;

/// Central error type for all archive operations.
///
/// Each variant represents a failure class from a specific layer, allowing
/// callers to match on what went wrong without inspecting message strings.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The page requires credentials the session does not hold.
    #[error("authorization required: {0}")]
    Authorization(String),

    /// The response matches the site's canonical not-found page.
    #[error("page not found: {0}")]
    NotFound(String),

    /// A page extractor met a structurally unexpected document.
    #[error("failed to extract page data: {0}")]
    Parse(String),

    /// The throttle worker for a wrapped operation is no longer running.
    ///
    /// Errors raised by the wrapped operation itself are never wrapped in
    /// this variant; they pass through to the caller verbatim.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// Transport-level failures (connection, TLS, timeout, body decode).
    #[error("network error: {0}")]
    Network(String),

    /// The session was explicitly closed and can no longer issue requests.
    #[error("session is closed")]
    SessionClosed,

    /// Invalid input (malformed identifiers, unparseable URLs).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (file loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
