//! Error types for the cataloger.
//!
//! Every per-entry failure mode here is recoverable: the entry cataloger
//! folds it into an `error` field on the emitted record instead of
//! propagating it past its own boundary.

use thiserror::Error;

/// Main error type for the cataloger library.
#[derive(Debug, Error)]
pub enum CatalogerError {
    /// No `<description>` element in the document.
    #[error("no <description> element found in document")]
    DescriptionNotFound,

    /// Malformed XML in a document entry.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Unknown processor name requested.
    #[error("unknown processor: '{0}'")]
    UnknownProcessor(String),

    /// Processor requires a tag path parameter that was not supplied.
    #[error("processor '{0}' requires a tag path parameter (e.g. '{0}=genre')")]
    MissingTagPath(String),

    /// Tag path parameter does not look like a tag name or slash path.
    #[error("invalid tag path: '{0}'")]
    InvalidTagPath(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive error.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error (record output).
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<roxmltree::Error> for CatalogerError {
    fn from(e: roxmltree::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<quick_xml::Error> for CatalogerError {
    fn from(e: quick_xml::Error) -> Self {
        // Keep stream failures distinguishable from malformed markup.
        match e {
            quick_xml::Error::Io(io) => {
                Self::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => Self::Xml(other.to_string()),
        }
    }
}

/// Result type alias for cataloger operations.
pub type Result<T> = std::result::Result<T, CatalogerError>;
