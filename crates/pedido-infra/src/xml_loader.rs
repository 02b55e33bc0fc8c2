//! XML order loader
//!
//! Finds every order element beneath the document root (at any depth) and
//! reads its direct children into an [`OrderRecord`]. Missing children are
//! blank, never errors. A document that is not well-formed fails as a whole.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use pedido_domain::model::{OrderField, OrderRecord, RawOrder};
use pedido_types::{Error, Result};

use crate::encoding::decode_document;

/// Tag of the order element in the buyer's export
pub const DEFAULT_ORDER_TAG: &str = "Pedidos";

/// Loads order records from XML documents
#[derive(Debug, Clone)]
pub struct XmlOrderLoader {
    order_tag: String,
}

impl Default for XmlOrderLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_TAG)
    }
}

impl XmlOrderLoader {
    pub fn new(order_tag: impl Into<String>) -> Self {
        Self {
            order_tag: order_tag.into(),
        }
    }

    pub fn order_tag(&self) -> &str {
        &self.order_tag
    }

    /// Read and parse one file
    pub fn load_file(&self, path: &Path) -> Result<Vec<OrderRecord>> {
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&path.display().to_string(), &bytes)
    }

    /// Parse raw document bytes; `source` names the document in errors
    pub fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<Vec<OrderRecord>> {
        let doc = decode_document(bytes).map_err(|e| Error::xml_parse(source, e))?;
        if doc.lossy {
            warn!(
                file = source,
                encoding = doc.encoding.name(),
                "some characters could not be decoded"
            );
        }
        self.parse_str(source, &doc.text)
    }

    /// Parse a document already decoded to UTF-8
    pub fn parse_str(&self, source: &str, text: &str) -> Result<Vec<OrderRecord>> {
        let mut reader = Reader::from_str(text);
        reader.check_end_names(true);

        let mut walker = OrderWalker::new(self.order_tag.as_bytes());
        loop {
            let event = reader.read_event().map_err(|e| {
                Error::xml_parse(source, at_position(e, text, reader.buffer_position() as usize))
            })?;
            let done = walker.handle(event).map_err(|e| {
                Error::xml_parse(source, at_position(e, text, reader.buffer_position() as usize))
            })?;
            if done {
                break;
            }
        }

        let records = walker.finish();
        debug!(file = source, records = records.len(), "parsed order document");
        Ok(records)
    }
}

/// An order element whose end tag has not been seen yet
struct OpenOrder {
    depth: usize,
    slot: usize,
    raw: RawOrder,
}

/// Tracks element nesting across reader events
struct OrderWalker<'t> {
    order_tag: &'t [u8],
    depth: usize,
    root_seen: bool,
    orders: Vec<OpenOrder>,
    /// Field whose text is being collected, as (index into `orders`, field)
    capture: Option<(usize, OrderField)>,
    /// Records in start-tag order; filled when the element closes
    slots: Vec<Option<OrderRecord>>,
    /// Internal entities declared in the DOCTYPE
    entities: HashMap<String, String>,
}

impl<'t> OrderWalker<'t> {
    fn new(order_tag: &'t [u8]) -> Self {
        Self {
            order_tag,
            depth: 0,
            root_seen: false,
            orders: Vec::new(),
            capture: None,
            slots: Vec::new(),
            entities: HashMap::new(),
        }
    }

    /// Returns `Ok(true)` at end of input
    fn handle(&mut self, event: Event<'_>) -> std::result::Result<bool, String> {
        match event {
            Event::Start(ref e) => self.start(e)?,
            Event::Empty(ref e) => {
                self.start(e)?;
                self.end()?;
            }
            Event::End(_) => self.end()?,
            Event::Text(e) => {
                let entities = &self.entities;
                let text = e
                    .unescape_with(|name| match predefined_entity(name) {
                        Some(value) => Some(value),
                        None => entities.get(name).map(String::as_str),
                    })
                    .map_err(|e| e.to_string())?;
                if self.depth == 0 {
                    if !text.trim().is_empty() {
                        return Err("syntax error: text outside the root element".to_string());
                    }
                } else {
                    self.push_text(&text);
                }
            }
            Event::CData(e) => {
                if self.depth == 0 {
                    return Err("syntax error: CDATA outside the root element".to_string());
                }
                let data = e.into_inner();
                self.push_text(&String::from_utf8_lossy(&data));
            }
            Event::Eof => {
                if !self.root_seen {
                    return Err("no element found".to_string());
                }
                if self.depth > 0 {
                    return Err("unclosed token at end of document".to_string());
                }
                return Ok(true);
            }
            Event::DocType(e) => {
                let declaration = e.into_inner();
                self.entities = declared_entities(&String::from_utf8_lossy(&declaration));
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
        }
        Ok(false)
    }

    fn start(&mut self, e: &BytesStart<'_>) -> std::result::Result<(), String> {
        if self.depth == 0 && self.root_seen {
            return Err("junk after document element".to_string());
        }
        check_start_tag(e)?;
        self.depth += 1;
        self.root_seen = true;
        self.capture = None;

        // The root element is never an order candidate
        if self.depth == 1 {
            return Ok(());
        }

        let name = e.name();
        let name = name.as_ref();

        if let Some(parent) = self.orders.len().checked_sub(1) {
            if self.orders[parent].depth + 1 == self.depth {
                let field = std::str::from_utf8(name).ok().and_then(OrderField::from_tag);
                if let Some(field) = field {
                    if self.orders[parent].raw.open_field(field) {
                        self.capture = Some((parent, field));
                    }
                }
            }
        }

        if name == self.order_tag {
            self.orders.push(OpenOrder {
                depth: self.depth,
                slot: self.slots.len(),
                raw: RawOrder::new(),
            });
            self.slots.push(None);
        }

        Ok(())
    }

    fn end(&mut self) -> std::result::Result<(), String> {
        if self.depth == 0 {
            return Err("unexpected end tag".to_string());
        }
        self.capture = None;

        if self.orders.last().map(|o| o.depth) == Some(self.depth) {
            if let Some(order) = self.orders.pop() {
                self.slots[order.slot] = Some(order.raw.into_record());
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if let Some((index, field)) = self.capture {
            self.orders[index].raw.push_text(field, text);
        }
    }

    fn finish(self) -> Vec<OrderRecord> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Reject start tags with a bad name or malformed attributes
fn check_start_tag(e: &BytesStart<'_>) -> std::result::Result<(), String> {
    if !is_name_start(e.name().as_ref()) {
        return Err("not well-formed (invalid token)".to_string());
    }
    // Duplicate, unquoted and value-less attributes fail here
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if !is_name_start(attr.key.as_ref()) {
            return Err("not well-formed (invalid token)".to_string());
        }
    }
    Ok(())
}

/// First character of an XML name: a letter, `_`, `:` or any non-ASCII char
fn is_name_start(name: &[u8]) -> bool {
    match std::str::from_utf8(name).ok().and_then(|n| n.chars().next()) {
        Some(c) => c.is_alphabetic() || c == '_' || c == ':' || !c.is_ascii(),
        None => false,
    }
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => None,
    }
}

/// Collect `<!ENTITY name "value">` declarations from a DOCTYPE body
///
/// Parameter and external entities are skipped.
fn declared_entities(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let quote = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let body = &rest[1..];
        let close = match body.find(quote) {
            Some(close) => close,
            None => break,
        };
        let value = &body[..close];
        let value = quick_xml::escape::unescape_with(value, predefined_entity)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        entities.entry(name.to_string()).or_insert(value);
        rest = &body[close + 1..];
    }
    entities
}

/// Append a line/column location to a parser message
fn at_position(message: impl std::fmt::Display, text: &str, position: usize) -> String {
    let consumed = &text.as_bytes()[..position.min(text.len())];
    let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = consumed
        .iter()
        .rev()
        .position(|&b| b == b'\n')
        .unwrap_or(consumed.len());
    format!("{}: line {}, column {}", message, line, column)
}
