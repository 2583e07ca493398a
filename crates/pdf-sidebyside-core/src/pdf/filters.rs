//! Stream filter chains.
//!
//! lopdf decodes Flate, LZW and ASCII85 but rejects ASCIIHex and run-length
//! encoding, both legal on content streams. Each filter of a chain is
//! applied in order; the two lopdf lacks are decoded here.

use lopdf::{Dictionary, Object, Stream};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("malformed {filter} data: {reason}")]
    Malformed {
        filter: &'static str,
        reason: &'static str,
    },

    #[error("cannot decode content stream: {0}")]
    Lopdf(#[from] lopdf::Error),
}

const fn malformed(filter: &'static str, reason: &'static str) -> FilterError {
    FilterError::Malformed { filter, reason }
}

/// Whether the stream declares any filter at all.
pub fn is_filtered(stream: &Stream) -> bool {
    !filter_chain(&stream.dict).is_empty()
}

/// Decode `stream` through its whole `/Filter` chain.
pub fn decode_stream(stream: &Stream) -> Result<Vec<u8>, FilterError> {
    let mut data = stream.content.clone();
    for (filter, parms) in filter_chain(&stream.dict) {
        data = match filter {
            b"ASCIIHexDecode" | b"AHx" => ascii_hex_decode(&data)?,
            b"RunLengthDecode" | b"RL" => run_length_decode(&data)?,
            b"Fl" => lopdf_decode(b"FlateDecode", parms, data)?,
            b"LZW" => lopdf_decode(b"LZWDecode", parms, data)?,
            b"A85" => lopdf_decode(b"ASCII85Decode", parms, data)?,
            other => lopdf_decode(other, parms, data)?,
        };
    }
    Ok(data)
}

/// `(filter, decode parameters)` pairs, outermost filter first.
fn filter_chain(dict: &Dictionary) -> Vec<(&[u8], Option<&Object>)> {
    let filters: Vec<&[u8]> = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.as_slice()],
        Ok(Object::Array(names)) => names.iter().filter_map(|n| n.as_name().ok()).collect(),
        _ => Vec::new(),
    };
    let parms: Vec<&Object> = match dict.get(b"DecodeParms") {
        Ok(Object::Array(items)) => items.iter().collect(),
        Ok(item) => vec![item],
        Err(_) => Vec::new(),
    };

    filters
        .into_iter()
        .enumerate()
        .map(|(i, filter)| {
            let parm = parms.get(i).copied().filter(|p| !matches!(p, Object::Null));
            (filter, parm)
        })
        .collect()
}

/// Run a single filter through lopdf.
fn lopdf_decode(filter: &[u8], parms: Option<&Object>, data: Vec<u8>) -> Result<Vec<u8>, FilterError> {
    let mut dict = Dictionary::new();
    dict.set("Filter", Object::Name(filter.to_vec()));
    if let Some(parms) = parms {
        dict.set("DecodeParms", parms.clone());
    }
    Ok(Stream::new(dict, data).decompressed_content()?)
}

/// PDF white-space characters (ISO 32000-1, table 1).
const fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

fn ascii_hex_decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high = None;

    for &byte in data {
        if byte == b'>' {
            break;
        }
        if is_pdf_whitespace(byte) {
            continue;
        }
        let nibble = char::from(byte)
            .to_digit(16)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| malformed("ASCIIHexDecode", "non-hex character"))?;
        match high.take() {
            Some(h) => out.push((h << 4) | nibble),
            None => high = Some(nibble),
        }
    }
    // An odd final digit is followed by an implicit 0
    if let Some(h) = high {
        out.push(h << 4);
    }
    Ok(out)
}

fn run_length_decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    const FILTER: &str = "RunLengthDecode";

    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;

    while let Some(&length) = data.get(pos) {
        pos += 1;
        match length {
            128 => break,
            0..=127 => {
                let count = usize::from(length) + 1;
                let literal = data
                    .get(pos..pos + count)
                    .ok_or_else(|| malformed(FILTER, "truncated literal run"))?;
                out.extend_from_slice(literal);
                pos += count;
            }
            _ => {
                let byte = *data.get(pos).ok_or_else(|| malformed(FILTER, "truncated repeat run"))?;
                out.extend(std::iter::repeat_n(byte, 257 - usize::from(length)));
                pos += 1;
            }
        }
    }
    Ok(out)
}
