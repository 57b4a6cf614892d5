//! homelib cataloger - Extract FB2 bibliographic metadata from zip archives.
//!
//! This crate scans a folder of zip archives, runs a chosen field processor
//! over every FB2 document entry and produces one tabular record per entry,
//! ready for appending to a catalog store.
//!
//! # Example
//!
//! ```
//! use homelib_cataloger::processors::Processor;
//!
//! // Processor specs as used on the command line
//! assert!(Processor::parse("catalog").is_ok());
//! assert!(Processor::parse("tag_text=genre").is_ok());
//! assert!(Processor::parse("not_a_processor").is_err());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and validation (extensions, field names, tag paths)
//! - [`error`]: Error types and Result alias
//! - [`record`]: Ordered, variable-width catalog records
//! - [`xml`]: Namespace-stripping description extraction and tree helpers
//! - [`processors`]: The closed set of field processors
//! - [`catalog`]: Entry and batch cataloging
//! - [`sink`]: Catalog sink interface and the JSON-lines reference sink
//! - [`cli`]: Command-line interface

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod processors;
pub mod record;
pub mod sink;
pub mod xml;

// Re-export commonly used items
pub use catalog::{catalog_archive, catalog_entry, catalog_folder, list_archives};
pub use error::{CatalogerError, Result};
pub use processors::Processor;
pub use record::{coerce_empty_to_null, CatalogRecord, FieldMap};
pub use sink::{CatalogSink, JsonlSink};
