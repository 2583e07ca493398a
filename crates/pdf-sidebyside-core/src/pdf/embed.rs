//! Embedding source pages as Form XObjects.
//!
//! A page is turned into a Form XObject whose `BBox` is the page's media box
//! and whose content is the page's content stream(s). Only objects reachable
//! from the page's content and resources are copied into the output; links
//! back into the page tree are cut so no other page comes along.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::document::{SourceDocument, inherited_attribute, resolve};
use super::filters::{FilterError, decode_stream, is_filtered};
use super::geometry::MediaBox;
use crate::error::{Error, Result};

/// Copies pages of one source document into an output document.
///
/// The object map lives as long as the embedder, so objects shared by
/// several pages (fonts, images) are copied once per compose call.
pub struct PageEmbedder<'a> {
    source: &'a SourceDocument,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageEmbedder<'a> {
    pub fn new(source: &'a SourceDocument) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Embed page `index` into `output` and return the XObject id.
    pub fn embed_page(&mut self, output: &mut Document, index: usize) -> Result<ObjectId> {
        let page = self.source.page(index).ok_or_else(|| {
            Error::compose(index, format!("{} document has no page {index}", self.source.side()))
        })?;
        let source = self.source.document();
        let page_dict = source
            .get_dictionary(page.id)
            .map_err(|e| Error::compose(index, e))?;

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
        xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
        xobject_dict.set("FormType", Object::Integer(1));
        xobject_dict.set("BBox", Object::Array(page.media_box.to_array()));

        if let Some(resources) = inherited_attribute(source, page_dict, b"Resources") {
            let copied = copy_object_deep(output, source, resources, &mut self.copied);
            xobject_dict.set("Resources", copied);
        }

        let content = page_content(source, page_dict).map_err(|e| Error::compose(index, e))?;
        for (key, value) in content.filter_entries {
            let copied = copy_object_deep(output, source, &value, &mut self.copied);
            xobject_dict.set(key, copied);
        }

        Ok(output.add_object(Stream::new(xobject_dict, content.data)))
    }
}

/// Content-stream command drawing an XObject at its native size with the
/// media box's lower-left corner at `(x, y)`.
pub fn placement_command(name: &str, media_box: &MediaBox, x: f32, y: f32) -> String {
    format!(
        "q 1 0 0 1 {} {} cm /{} Do Q\n",
        x - media_box.llx,
        y - media_box.lly,
        name
    )
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Page content ready to become an XObject stream.
struct PageContent {
    data: Vec<u8>,
    /// `Filter`/`DecodeParms` to carry over when `data` is still encoded
    filter_entries: Vec<(Vec<u8>, Object)>,
}

impl PageContent {
    const fn decoded(data: Vec<u8>) -> Self {
        Self {
            data,
            filter_entries: Vec::new(),
        }
    }
}

fn page_content(doc: &Document, page_dict: &Dictionary) -> std::result::Result<PageContent, FilterError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        // No content = blank page
        return Ok(PageContent::decoded(Vec::new()));
    };

    match resolve(doc, contents) {
        Object::Stream(stream) => Ok(single_content_stream(stream)),
        Object::Array(parts) => concatenated_content_streams(doc, parts).map(PageContent::decoded),
        _ => Ok(PageContent::decoded(Vec::new())),
    }
}

/// A single stream is kept encoded when its filter chain cannot be decoded.
fn single_content_stream(stream: &Stream) -> PageContent {
    if !is_filtered(stream) {
        return PageContent::decoded(stream.content.clone());
    }
    decode_stream(stream).map_or_else(
        |_| PageContent {
            data: stream.content.clone(),
            filter_entries: [b"Filter".as_slice(), b"DecodeParms".as_slice()]
                .into_iter()
                .filter_map(|key| {
                    stream
                        .dict
                        .get(key)
                        .ok()
                        .map(|value| (key.to_vec(), value.clone()))
                })
                .collect(),
        },
        PageContent::decoded,
    )
}

/// Concatenate multiple content streams, decoding each one.
fn concatenated_content_streams(
    doc: &Document,
    parts: &[Object],
) -> std::result::Result<Vec<u8>, FilterError> {
    let mut result = Vec::new();

    for part in parts {
        let Object::Stream(stream) = resolve(doc, part) else {
            continue;
        };
        result.extend_from_slice(&decode_stream(stream)?);
        result.push(b'\n');
    }

    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// References to `Page`, `Pages` or `Catalog` objects become `null`.
/// Referenced objects get their output id before their body is copied, so
/// reference cycles terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Object {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = copied.get(id) {
                return Object::Reference(new_id);
            }

            let Ok(referenced) = source.get_object(*id) else {
                // Dangling references read as null (ISO 32000-1, 7.3.10)
                return Object::Null;
            };
            if is_page_tree_node(referenced) {
                return Object::Null;
            }

            let new_id = output.new_object_id();
            copied.insert(*id, new_id);
            let body = copy_object_deep(output, source, referenced, copied);
            output.objects.insert(new_id, body);

            Object::Reference(new_id)
        }
        Object::Dictionary(dict) => Object::Dictionary(copy_dictionary(output, source, dict, copied)),
        Object::Array(arr) => Object::Array(
            arr.iter()
                .map(|item| copy_object_deep(output, source, item, copied))
                .collect(),
        ),
        Object::Stream(stream) => {
            let mut new_stream = stream.clone();
            new_stream.dict = copy_dictionary(output, source, &stream.dict, copied);
            #[allow(clippy::cast_possible_wrap)]
            let length = stream.content.len() as i64;
            new_stream.dict.set("Length", Object::Integer(length));
            new_stream.start_position = None;
            Object::Stream(new_stream)
        }
        // Primitive types: just clone
        _ => obj.clone(),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Dictionary {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, copied));
    }
    new_dict
}

fn is_page_tree_node(obj: &Object) -> bool {
    matches!(obj.type_name(), Ok(b"Page" | b"Pages" | b"Catalog"))
}
