//! In-memory PDF builders for tests.
//!
//! Every page draws its label with a shared Helvetica font so tests can
//! check which source page ended up where by searching decoded content.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// How a fixture page stores its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLayout {
    /// One uncompressed stream
    #[default]
    Plain,
    /// One Flate-compressed stream
    Compressed,
    /// `q 0.5 g` in a plain stream, then the label and `Q` in a
    /// Flate-compressed one
    Split,
    /// Like `Split`, but the first part is `ASCIIHexDecode` and the second
    /// `[/ASCIIHexDecode /FlateDecode]`
    SplitAsciiHex,
}

/// A page to generate: media box size, origin, a text label and the way
/// its content is stored.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub width: f32,
    pub height: f32,
    pub origin: (f32, f32),
    pub label: String,
    pub layout: ContentLayout,
}

impl FixturePage {
    pub fn new(width: f32, height: f32, label: impl Into<String>) -> Self {
        Self {
            width,
            height,
            origin: (0.0, 0.0),
            label: label.into(),
            layout: ContentLayout::Plain,
        }
    }

    #[must_use]
    pub const fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: ContentLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// `count` pages of the given size labelled `{prefix}-{i}`.
pub fn labelled(prefix: &str, count: usize, width: f32, height: f32) -> Vec<FixturePage> {
    (0..count)
        .map(|i| FixturePage::new(width, height, format!("{prefix}-{i}")))
        .collect()
}

fn label_content(label: &str, x: f32, y: f32) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(label)]),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().expect("label content should encode")
}

/// Flate-compress `data`. Trailing blanks make it long enough for lopdf to
/// actually apply the filter.
fn flate_stream(mut data: Vec<u8>) -> Stream {
    data.extend_from_slice(&[b' '; 256]);
    let mut stream = Stream::new(Dictionary::new(), data);
    stream.compress().expect("fixture stream should compress");
    assert!(stream.dict.get(b"Filter").is_ok(), "fixture stream left uncompressed");
    stream
}

/// Wrap an encoded stream in an outer `ASCIIHexDecode` filter.
fn ascii_hex_stream(inner: Stream) -> Stream {
    let mut filters = vec![Object::Name(b"ASCIIHexDecode".to_vec())];
    match inner.dict.get(b"Filter") {
        Ok(Object::Name(name)) => filters.push(Object::Name(name.clone())),
        Ok(Object::Array(names)) => filters.extend(names.iter().cloned()),
        _ => {}
    }

    let mut hex = String::with_capacity(inner.content.len() * 2 + 1);
    for (i, byte) in inner.content.iter().enumerate() {
        if i > 0 && i % 32 == 0 {
            hex.push('\n');
        }
        hex.push_str(&format!("{byte:02X}"));
    }
    hex.push('>');

    let filter = match filters.as_slice() {
        [single] => single.clone(),
        _ => Object::Array(filters),
    };
    Stream::new(Dictionary::from_iter([("Filter", filter)]), hex.into_bytes())
}

fn page_contents(doc: &mut Document, page: &FixturePage) -> Object {
    let (x, y) = page.origin;
    let label = label_content(&page.label, x + 10.0, y + 10.0);
    let closed_label = [label.as_slice(), b"\nQ"].concat();
    let plain = |data: Vec<u8>| Stream::new(Dictionary::new(), data);

    match page.layout {
        ContentLayout::Plain => Object::Reference(doc.add_object(plain(label))),
        ContentLayout::Compressed => Object::Reference(doc.add_object(flate_stream(label))),
        ContentLayout::Split => {
            let first = doc.add_object(plain(b"q 0.5 g".to_vec()));
            let second = doc.add_object(flate_stream(closed_label));
            Object::Array(vec![Object::Reference(first), Object::Reference(second)])
        }
        ContentLayout::SplitAsciiHex => {
            let first = doc.add_object(ascii_hex_stream(plain(b"q 0.5 g".to_vec())));
            let second = doc.add_object(ascii_hex_stream(flate_stream(closed_label)));
            Object::Array(vec![Object::Reference(first), Object::Reference(second)])
        }
    }
}

fn finish(mut doc: Document, pages_id: ObjectId, pages: Dictionary) -> Vec<u8> {
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture document should serialize");
    output
}

/// Build a document with one page per entry (an empty slice gives a
/// zero-page document).
pub fn sample_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let (x, y) = page.origin;
        let contents = page_contents(&mut doc, page);
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", contents),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    x.into(),
                    y.into(),
                    (x + page.width).into(),
                    (y + page.height).into(),
                ]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    #[allow(clippy::cast_possible_wrap)]
    let count = kids.len() as i64;
    let page_tree = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    finish(doc, pages_id, page_tree)
}

/// Build a document whose pages carry neither `MediaBox` nor `Resources`;
/// both live on the page tree root. Page `i` is labelled `page-{i}`.
pub fn inherited_media_box_pdf(width: f32, height: f32, count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let kids: Vec<Object> = (0..count)
        .map(|i| {
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                label_content(&format!("page-{i}"), 10.0, 10.0),
            ));
            Object::Reference(doc.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content_id)),
            ])))
        })
        .collect();

    #[allow(clippy::cast_possible_wrap)]
    let count = count as i64;
    let page_tree = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
        (
            "MediaBox",
            Object::Array(vec![0.into(), 0.into(), width.into(), height.into()]),
        ),
        (
            "Resources",
            Object::Dictionary(Dictionary::from_iter([(
                "Font",
                Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
            )])),
        ),
    ]);
    finish(doc, pages_id, page_tree)
}
