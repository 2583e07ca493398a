mod compose;
mod document;
mod embed;
mod filters;
mod geometry;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use compose::{ComposeOptions, ComposedDocument, ComposedPage, Composer};
pub use document::{Page, SourceDocument};
pub use embed::{PageEmbedder, copy_object_deep, placement_command};
pub use geometry::{DEFAULT_PAGE_SIZE, MediaBox, PageSize, PairLayout, Placement};
