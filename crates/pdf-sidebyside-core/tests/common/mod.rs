//! Inspection helpers for integration tests. Inputs come from
//! `pdf_sidebyside_core::pdf::fixtures`.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId, Stream};

// =============================================================================
// Inspection
// =============================================================================

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {other:?}"),
    }
}

pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("output should be a valid PDF")
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// `(width, height)` of every output page, in order.
pub fn page_sizes(doc: &Document) -> Vec<(f32, f32)> {
    page_ids(doc)
        .into_iter()
        .map(|id| {
            let mb = doc.get_dictionary(id).unwrap().get(b"MediaBox").unwrap().as_array().unwrap();
            (number(&mb[2]) - number(&mb[0]), number(&mb[3]) - number(&mb[1]))
        })
        .collect()
}

/// A `cm ... Do` pair from an output page: XObject name and matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub name: String,
    pub matrix: [f32; 6],
}

pub fn draws(doc: &Document, page_id: ObjectId) -> Vec<Draw> {
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let mut matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut result = Vec::new();
    for op in content.operations {
        match op.operator.as_str() {
            "cm" => {
                for (slot, operand) in matrix.iter_mut().zip(&op.operands) {
                    *slot = number(operand);
                }
            }
            "Do" => result.push(Draw {
                name: String::from_utf8(op.operands[0].as_name().unwrap().to_vec()).unwrap(),
                matrix,
            }),
            "Q" => matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            _ => {}
        }
    }
    result
}

fn decoded(stream: &Stream) -> Vec<u8> {
    stream.decompressed_content().unwrap_or_else(|_| stream.content.clone())
}

/// The Form XObject registered under `name` on an output page.
pub fn xobject<'a>(doc: &'a Document, page_id: ObjectId, name: &str) -> &'a Stream {
    let resources = doc.get_dictionary(page_id).unwrap().get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let id = xobjects.get(name.as_bytes()).unwrap().as_reference().unwrap();
    doc.get_object(id).unwrap().as_stream().unwrap()
}

pub fn xobject_text(doc: &Document, page_id: ObjectId, name: &str) -> String {
    String::from_utf8_lossy(&decoded(xobject(doc, page_id, name))).into_owned()
}

pub fn xobject_bbox(doc: &Document, page_id: ObjectId, name: &str) -> [f32; 4] {
    let bbox = xobject(doc, page_id, name).dict.get(b"BBox").unwrap().as_array().unwrap();
    [number(&bbox[0]), number(&bbox[1]), number(&bbox[2]), number(&bbox[3])]
}

/// Decoded content of every stream in the document, concatenated.
pub fn all_stream_text(doc: &Document) -> String {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .map(|stream| String::from_utf8_lossy(&decoded(stream)).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
