//! Archivist Extract - page extractors for the archive.
//!
//! An extractor takes a parsed document and returns a typed record of every
//! field its page kind declares, with deterministic defaults for anything
//! the page doesn't carry. Extractors never fail on missing optional
//! fields, only on documents that aren't the expected page kind at all.
//!
//! # Example
//!
//! ```rust
//! use archivist_extract::WorkExtractor;
//! use scraper::Html;
//!
//! # fn main() -> archivist_core::Result<()> {
//! let html = Html::parse_document(
//!     r#"<h2 class="title heading">An Example Work</h2>"#,
//! );
//! let fields = WorkExtractor::new(&html).extract()?;
//! assert_eq!(fields.title, "An Example Work");
//! assert_eq!(fields.author, "Anonymous");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod select;
#[allow(missing_docs)]
pub mod user;
#[allow(missing_docs)]
pub mod work;

// Re-export commonly used types
pub use user::{UserExtractor, UserFields};
pub use work::{WorkExtractor, WorkFields};
