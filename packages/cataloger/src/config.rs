//! Configuration constants and validation functions for the cataloger.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CatalogerError, Result};

/// Filename suffix identifying document entries inside an archive.
pub const DOCUMENT_EXTENSION: &str = ".fb2";

/// Filename suffix identifying archive files inside a library folder.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Local name of the bibliographic metadata element in FB2 documents.
pub const DESCRIPTION_TAG: &str = "description";

/// Provenance field: archive file name (without directory).
pub const FIELD_ZIPFILE: &str = "zipfile";

/// Provenance field: entry name inside the archive.
pub const FIELD_XML_FILENAME: &str = "xml_filename";

/// Diagnostic field carried by failure records instead of processor fields.
pub const FIELD_ERROR: &str = "error";

/// Default catalog table name for sink-mode appends.
pub const DEFAULT_TABLE: &str = "lib_current";

/// Tag path pattern: one or more XML local names separated by slashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*(?:/[A-Za-z_][A-Za-z0-9_.\-]*)*$")
        .expect("valid regex")
});

/// Validate a tag path parameter for the `tag_text` family of processors.
///
/// A tag path is a local tag name, optionally followed by further names
/// separated by `/` (e.g. `genre` or `title-info/genre`).
///
/// # Arguments
/// * `path` - The tag path to validate
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(CatalogerError::InvalidTagPath)` if invalid
///
/// # Examples
/// ```
/// use homelib_cataloger::config::validate_tag_path;
///
/// assert!(validate_tag_path("genre").is_ok());
/// assert!(validate_tag_path("title-info/book-title").is_ok());
/// assert!(validate_tag_path("no spaces").is_err());
/// assert!(validate_tag_path("/leading").is_err());
/// ```
pub fn validate_tag_path(path: &str) -> Result<()> {
    if TAG_PATH_PATTERN.is_match(path) {
        Ok(())
    } else {
        Err(CatalogerError::InvalidTagPath(path.to_string()))
    }
}

/// Check whether an archive entry name identifies a document.
///
/// Documents are identified purely by filename suffix; entries ending in a
/// path separator are directory markers and always excluded.
///
/// # Examples
/// ```
/// use homelib_cataloger::config::is_document_entry;
///
/// assert!(is_document_entry("books/12345.fb2"));
/// assert!(!is_document_entry("cover.jpg"));
/// assert!(!is_document_entry("books.fb2/"));
/// ```
#[must_use]
pub fn is_document_entry(name: &str) -> bool {
    name.ends_with(DOCUMENT_EXTENSION) && !name.ends_with('/')
}
