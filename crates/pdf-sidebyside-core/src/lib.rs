//! PDF Side-by-Side Core Library
//!
//! Combines two PDF documents page by page: page `i` of the first document
//! and page `i` of the second are drawn next to each other on one wider
//! page, at their native size and top-aligned.
//! - Parsing input documents ([`SourceDocument`])
//! - Per-pair geometry ([`PairLayout`])
//! - Page embedding and output serialization ([`Composer`])
//!
//! The composer is a pure transform: it keeps no state between calls and
//! does no I/O or logging.

pub mod config;
pub mod error;
pub mod pdf;

pub use config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OUTPUT_FILENAME, DEFAULT_PDF_VERSION};
pub use error::{Error, ErrorClass, Result, Side};
pub use pdf::{
    ComposeOptions, ComposedDocument, ComposedPage, Composer, MediaBox, Page, PageSize, PairLayout,
    Placement, SourceDocument,
};

/// Merge two PDFs side by side with default options.
///
/// The result has `min(pages(left), pages(right))` pages; page `i` is
/// `left[i]` followed by `right[i]`.
pub fn compose(left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    Composer::default().compose(left, right)
}
