//! Epub packer
//!
//! A Rust library for assembling EPUB eBook packages.
//!
//! The library turns book metadata, a table of contents, a reading order and
//! a set of content files into a sealed ZIP archive conforming to EPUB 3,
//! with the EPUB 2 navigation control file and guide kept for older
//! reading systems.
//!
//! ## Features
//!
//! - Resolve a partial configuration over built-in defaults, from Rust or from JSON.
//! - Bundled translation tables for landmark labels, with fallback to English.
//! - Generate the package document, the navigation document, the NCX and the
//!   Apple display options from the registered resources.
//! - Write the `mimetype` entry first and uncompressed, as reading systems expect.
//!
//! ## Quick Start
//!
//! ```rust
//! # fn main() -> Result<(), epub_packer::error::EpubError> {
//! use epub_packer::{EpubBuilder, config::PartialConfig};
//!
//! let config = PartialConfig::from_json(r#"{
//!     "meta": { "title": "A Book", "ids": { "isbn": "9780000000002" } },
//!     "landmarks": { "bodymatter": "chapter1.xhtml", "toc": "nav.xhtml" },
//!     "spine": ["chapter1.xhtml"],
//!     "toc": [{ "text": "Chapter 1", "href": "chapter1.xhtml" }]
//! }"#)?;
//!
//! let mut builder = EpubBuilder::init(config)?;
//! builder.add_text_file("chapter1.xhtml", "<html>...</html>", &[])?;
//!
//! let epub = builder.seal()?;
//! assert_eq!(&epub[30..38], b"mimetype");
//! # Ok(())
//! # }
//! ```

pub(crate) mod utils;

pub mod archive;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod locale;
pub mod mime;
pub mod registry;
pub mod types;

pub use builder::EpubBuilder;
