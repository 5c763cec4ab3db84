//! Archivist Core - shared foundation for the archivist client library.
//!
//! This crate provides the pieces every other archivist crate builds on:
//! the central error taxonomy, TOML-backed configuration, and validated
//! identifier newtypes.
//!
//! # Example
//!
//! ```rust
//! use archivist_core::{ClientConfig, WorkId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! assert_eq!(config.throttle.interval_ms, 1000);
//!
//! let id = WorkId::new("12345")?;
//! assert_eq!(id.as_str(), "12345");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, NetworkConfig, ThrottleConfig, ARCHIVE_URL};
pub use error::{ArchiveError, ConfigError, ConfigResult, Result};
pub use types::{Username, WorkId};
