//! homelib maintenance - Rewrite and repack library zip archives.
//!
//! This crate consumes catalog-derived per-archive entry lists and mutates
//! the library's zip archives: deleting retired entries in place, or
//! repacking selected subsets (typically error records) into new archives
//! in a separate folder.
//!
//! Two strategies are available for both operations and their trade-off is
//! deliberate: the in-process rewrite stages into a sibling file and
//! atomically renames over the target, while the external-tool path
//! delegates to a command-line archiver that mutates archives in place
//! with no atomicity guarantee.
//!
//! # Architecture
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Strategy choice and run reports
//! - [`plan`]: Per-archive entry name sets from catalog exports
//! - [`archiver`]: External archiver invocation
//! - [`delete`]: Delete-entries operation
//! - [`repack`]: Repack-subset operation
//! - [`cli`]: Command-line interface

pub mod archiver;
pub mod cli;
pub mod delete;
pub mod error;
pub mod plan;
pub mod repack;
pub mod types;

// Re-export commonly used items
pub use delete::delete_entries;
pub use error::{MaintenanceError, Result};
pub use plan::EntryPlan;
pub use repack::repack_subset;
pub use types::{MaintenanceReport, Strategy};
