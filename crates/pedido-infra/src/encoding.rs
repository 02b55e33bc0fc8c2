//! Character set detection for XML documents
//!
//! Order exports from older ERP systems are often ISO-8859-1 or windows-1252.
//! Documents are transcoded to UTF-8 before the XML reader sees them.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

/// How many leading bytes are searched for the XML declaration
const DECL_SCAN_LIMIT: usize = 1024;

/// A document transcoded to UTF-8
#[derive(Debug)]
pub struct DecodedDocument<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
    /// Some bytes were replaced with U+FFFD
    pub lossy: bool,
}

/// Decode raw document bytes using the BOM or the declared encoding
///
/// Invalid UTF-8 is an error, since it would make the document malformed.
/// Decoding errors in a declared legacy encoding are tolerated and flagged as lossy.
pub fn decode_document(bytes: &[u8]) -> Result<DecodedDocument<'_>, String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    let (text, lossy) = encoding.decode_without_bom_handling(body);
    if lossy && encoding == UTF_8 {
        return Err("not well-formed (invalid UTF-8 byte sequence)".to_string());
    }

    Ok(DecodedDocument {
        text,
        encoding,
        lossy,
    })
}

/// Read the `encoding` pseudo-attribute of an `<?xml ...?>` declaration
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECL_SCAN_LIMIT)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = find(head, b"?>")?;
    let decl = &head[..end];

    let attr = find(decl, b"encoding")?;
    let rest = &decl[attr + b"encoding".len()..];
    let rest = trim_start(rest).strip_prefix(b"=")?;
    let rest = trim_start(rest);

    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let close = value.iter().position(|&b| b == quote)?;
    Encoding::for_label(&value[..close])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}
