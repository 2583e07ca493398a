use std::fmt;

use thiserror::Error;

/// Which of the two input documents an error or embedding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// First document, drawn in the left column.
    Left,
    /// Second document, drawn in the right column.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Coarse classification handed to callers.
///
/// Transports map `MissingInput` to a caller error (400-class) and
/// `ProcessingFailure` to a server error (500-class).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    MissingInput,
    ProcessingFailure,
}

/// Unified error type for pdf-sidebyside-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Input collection (a document was not supplied)
/// - PDF operations (parsing, embedding, saving)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// One of the two documents was not supplied
    #[error("missing {0} document")]
    MissingInput(Side),

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// A supplied buffer is not a well-formed (or supported) PDF
    #[error("failed to parse {side} PDF: {reason}")]
    PdfParse { side: Side, reason: String },

    /// Failed to embed a page pair into the output document
    #[error("failed to compose page {page}: {reason}")]
    PdfCompose { page: usize, reason: String },

    /// Failed to serialize the output document
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingInput(_) => ErrorClass::MissingInput,
            _ => ErrorClass::ProcessingFailure,
        }
    }

    pub(crate) fn compose(page: usize, err: impl fmt::Display) -> Self {
        Self::PdfCompose {
            page,
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
