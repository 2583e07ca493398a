//! Side-by-side page composition.
//!
//! # Coordinate System
//!
//! PDF uses a **bottom-left origin**, so "top-aligned" means a page shorter
//! than the canvas is lifted by the height difference:
//! ```text
//! y = canvas_height - page_height
//! ```
//!
//! # Composition Strategy
//!
//! For every index shared by both documents:
//! 1. Embed the left and right source pages as Form XObjects
//! 2. Create one output page as wide as both and as tall as the taller one
//! 3. Draw each XObject at its native size, left page at `x = 0`, right
//!    page at `x = left width`
//!
//! Pages past the shorter document's length are ignored.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::document::SourceDocument;
use super::embed::{PageEmbedder, placement_command};
use super::geometry::{PageSize, PairLayout};
use crate::config::{DEFAULT_PDF_VERSION, is_supported_pdf_version};
use crate::error::{Error, Result, Side};

/// XObject resource names used on every output page.
const LEFT_XOBJECT: &str = "L";
const RIGHT_XOBJECT: &str = "R";

const PRODUCER: &str = concat!("pdf-sidebyside ", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Public Types
// =============================================================================

/// Options for the merged document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Flate-compress streams before saving
    pub compress: bool,
    /// Version written to the `%PDF-x.y` header
    pub pdf_version: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            compress: true,
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
        }
    }
}

/// Layout of one output page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedPage {
    /// 0-based index shared by both source pages
    pub index: usize,
    pub layout: PairLayout,
}

impl ComposedPage {
    pub const fn size(&self) -> PageSize {
        self.layout.canvas
    }
}

/// The merged document, ready to serialize.
pub struct ComposedDocument {
    document: Document,
    pages: Vec<ComposedPage>,
    compress: bool,
}

impl ComposedDocument {
    pub fn pages(&self) -> &[ComposedPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize to PDF bytes.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        if self.compress {
            self.document.compress();
        }

        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(e.to_string()))?;
        Ok(output)
    }
}

impl std::fmt::Debug for ComposedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedDocument")
            .field("pages", &self.pages)
            .field("compress", &self.compress)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Composer
// =============================================================================

/// Stateless side-by-side composer.
///
/// Holds only options; every call parses, builds and drops its own
/// documents, so one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    options: ComposeOptions,
}

impl Composer {
    pub const fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Merge two PDFs page by page into side-by-side spreads.
    pub fn compose(&self, left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
        let left = SourceDocument::parse(left, Side::Left)?;
        let right = SourceDocument::parse(right, Side::Right)?;
        self.compose_documents(&left, &right)?.to_bytes()
    }

    /// Like [`Composer::compose`], but fails with [`Error::MissingInput`]
    /// before parsing anything when either document is absent.
    pub fn compose_inputs(&self, left: Option<&[u8]>, right: Option<&[u8]>) -> Result<Vec<u8>> {
        let left = left.ok_or(Error::MissingInput(Side::Left))?;
        let right = right.ok_or(Error::MissingInput(Side::Right))?;
        self.compose(left, right)
    }

    /// Build the merged document from already parsed sources.
    pub fn compose_documents(
        &self,
        left: &SourceDocument,
        right: &SourceDocument,
    ) -> Result<ComposedDocument> {
        // The version string goes verbatim into the `%PDF-` header
        if !is_supported_pdf_version(&self.options.pdf_version) {
            return Err(Error::ConfigInvalid {
                field: "pdf_version".into(),
                reason: format!("{:?} is not one of 1.0-1.7 or 2.0", self.options.pdf_version),
            });
        }

        let mut document = Document::with_version(self.options.pdf_version.as_str());
        let pages_id = document.new_object_id();

        let pair_count = left.page_count().min(right.page_count());
        let mut left_embedder = PageEmbedder::new(left);
        let mut right_embedder = PageEmbedder::new(right);
        let mut pages = Vec::with_capacity(pair_count);
        let mut kids = Vec::with_capacity(pair_count);

        for (index, (left_page, right_page)) in left.pages().iter().zip(right.pages()).enumerate() {
            let layout = PairLayout::side_by_side(left_page.size(), right_page.size());

            let left_xobject = left_embedder.embed_page(&mut document, index)?;
            let right_xobject = right_embedder.embed_page(&mut document, index)?;

            let mut content = placement_command(
                LEFT_XOBJECT,
                &left_page.media_box,
                layout.left.x,
                layout.left.y,
            );
            content.push_str(&placement_command(
                RIGHT_XOBJECT,
                &right_page.media_box,
                layout.right.x,
                layout.right.y,
            ));

            let page_id = add_page(
                &mut document,
                pages_id,
                layout.canvas,
                &[(LEFT_XOBJECT, left_xobject), (RIGHT_XOBJECT, right_xobject)],
                content,
            );
            kids.push(Object::Reference(page_id));
            pages.push(ComposedPage { index, layout });
        }

        finish_document(&mut document, pages_id, kids);

        Ok(ComposedDocument {
            document,
            pages,
            compress: self.options.compress,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn add_page(
    document: &mut Document,
    parent: ObjectId,
    size: PageSize,
    xobjects: &[(&str, ObjectId)],
    content: String,
) -> ObjectId {
    let mut xobject_dict = Dictionary::new();
    for (name, id) in xobjects {
        xobject_dict.set(name.as_bytes(), Object::Reference(*id));
    }
    let resources = Dictionary::from_iter([("XObject", Object::Dictionary(xobject_dict))]);

    let content_id = document.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    document.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(size.width),
                Object::Real(size.height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]))
}

/// Page tree, catalog and info dictionary.
fn finish_document(document: &mut Document, pages_id: ObjectId, kids: Vec<Object>) {
    #[allow(clippy::cast_possible_wrap)]
    let count = kids.len() as i64;
    let pages_dict = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    document.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = document.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    let info_id = document.add_object(Dictionary::from_iter([
        ("Producer", Object::string_literal(PRODUCER)),
        ("Creator", Object::string_literal(PRODUCER)),
    ]));

    document.trailer.set("Root", Object::Reference(catalog_id));
    document.trailer.set("Info", Object::Reference(info_id));
}

// =============================================================================
// Tests
// =============================================================================
