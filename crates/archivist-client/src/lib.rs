//! Archivist Client - rate-limited transport session for the archive.
//!
//! This crate provides the concurrency core of the library: a generic
//! throttled dispatcher that serializes calls through one worker task with
//! a minimum interval between them, and the [`Session`] that routes all
//! GET/POST traffic through two such lanes over one shared HTTP client.
//!
//! # Architecture
//!
//! - **Throttle** ([`throttle`]): FIFO dispatch queue with one long-lived
//!   worker per wrapped operation
//! - **Session** ([`session`]): URL resolution, response classification,
//!   cookie persistence
//! - **Document** ([`document`]): owned response body, parsed on demand
//!
//! # Example
//!
//! ```rust,no_run
//! use archivist_client::Session;
//! use archivist_core::ClientConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> archivist_core::Result<()> {
//! // One session per process: shared cookie jar, shared rate limit.
//! let session = Arc::new(Session::new(&ClientConfig::default())?);
//!
//! let page = session.fetch_document("/works/12345", None).await?;
//! println!("{} bytes", page.body().len());
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod document;
pub mod session;
pub mod throttle;

// Re-export commonly used types
pub use document::Document;
pub use session::{PageSource, Session};
pub use throttle::{dispatch_throttled, DispatchError, Throttled};
