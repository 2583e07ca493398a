use lopdf::{Dictionary, Document, Object, ObjectId};

use super::geometry::{MediaBox, PageSize};
use crate::error::{Error, Result, Side};

/// Maximum `/Parent` hops followed when resolving inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 64;

static NULL: Object = Object::Null;

/// One page of a source document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    /// Object id of the page dictionary inside its source document
    pub id: ObjectId,
    /// Effective media box (inherited from the page tree when needed)
    pub media_box: MediaBox,
}

impl Page {
    pub fn size(&self) -> PageSize {
        self.media_box.size()
    }
}

/// A parsed input PDF.
///
/// Owned by a single compose call and dropped when it returns.
pub struct SourceDocument {
    side: Side,
    doc: Document,
    pages: Vec<Page>,
}

impl SourceDocument {
    /// Parse a PDF from bytes.
    ///
    /// `side` only labels errors so callers can tell the inputs apart.
    pub fn parse(bytes: &[u8], side: Side) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::PdfParse {
            side,
            reason: e.to_string(),
        })?;

        if doc.is_encrypted() {
            return Err(Error::PdfParse {
                side,
                reason: "encrypted PDFs are not supported".to_string(),
            });
        }

        let pages = doc
            .get_pages()
            .into_values()
            .map(|id| {
                let dict = doc.get_dictionary(id).map_err(|e| Error::PdfParse {
                    side,
                    reason: format!("page object {id:?}: {e}"),
                })?;
                let media_box = inherited_attribute(&doc, dict, b"MediaBox")
                    .and_then(|obj| resolve(&doc, obj).as_array().ok())
                    .and_then(|arr| MediaBox::from_array(arr))
                    .unwrap_or_default();
                Ok(Page { id, media_box })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { side, doc, pages })
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub(crate) const fn document(&self) -> &Document {
        &self.doc
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("side", &self.side)
            .field("page_count", &self.pages.len())
            .field("version", &self.doc.version)
            .finish()
    }
}

/// Look up an inheritable page attribute (`MediaBox`, `Resources`, ...),
/// walking up the `/Parent` chain when the page itself lacks it.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Follow a reference chain to the object it points at.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    let mut current = obj;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => current = target,
                Err(_) => return &NULL,
            },
            _ => return current,
        }
    }
    &NULL
}
