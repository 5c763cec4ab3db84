//! Archivist Entities - lazily-loaded domain objects for the archive.
//!
//! A [`Work`] or [`User`] is constructed from its identifier plus a shared
//! page source (the session) and fetches its page on first field access.
//! Repeated reads never refetch; an explicit [`Work::reload`] does. All
//! entities in a process should share one session `Arc` so the whole
//! program honors a single rate limit and cookie jar.
//!
//! # Example
//!
//! ```rust,no_run
//! use archivist_client::Session;
//! use archivist_core::{ClientConfig, WorkId};
//! use archivist_entities::Work;
//! use std::sync::Arc;
//!
//! # async fn run() -> archivist_core::Result<()> {
//! let session = Arc::new(Session::new(&ClientConfig::default())?);
//!
//! let work = Work::new(WorkId::new("12345")?, session.clone());
//! println!("{} ({} words)", work.title().await?, work.words().await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod user;
pub mod work;

// Re-export commonly used types
pub use user::{User, UserMetadata};
pub use work::{Work, WorkMetadata};
