//! Owned XML tree for EUtils responses
//!
//! Responses are small (one document per request), so they are read once into
//! an owned tree with `quick_xml::Reader` and then queried by the shape parsers
//! through [`Element::select`].

mod path;
mod record;

pub use record::{FieldValue, Record};

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ELinkError, Result};

/// A parsed XML response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlDocument {
    root: Element,
}

/// One element of an [`XmlDocument`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    name: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
}

impl XmlDocument {
    /// Parse an XML string into a document tree
    ///
    /// # Example
    ///
    /// ```
    /// use elink_client::XmlDocument;
    ///
    /// let doc = XmlDocument::parse("<eLinkResult><LinkSet><DbFrom>pubmed</DbFrom></LinkSet></eLinkResult>")?;
    /// assert_eq!(doc.root().name(), "eLinkResult");
    /// assert_eq!(doc.select_text("//DbFrom"), vec!["pubmed"]);
    /// # Ok::<(), elink_client::ELinkError>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ELinkError::XmlError(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) => stack.push(Element::from_start(e)?),
                Event::End(_) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        ELinkError::XmlError("closing tag without opening tag".to_string())
                    })?;
                    element.finish_text();

                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None if root.is_none() => root = Some(element),
                        None => {
                            return Err(ELinkError::XmlError(
                                "document has more than one root element".to_string(),
                            ));
                        }
                    }
                }
                Event::Text(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| ELinkError::XmlError(err.to_string()))?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ELinkError::XmlError(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        let root = root
            .ok_or_else(|| ELinkError::XmlError("document has no root element".to_string()))?;
        debug!(root = %root.name, "Parsed XML document");

        Ok(Self { root })
    }

    /// Wrap an element as the root of a new document
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Evaluate a path expression against the whole document
    ///
    /// Absolute paths (`/eLinkResult/LinkSet`) start at the root element;
    /// `//Name` matches `Name` anywhere in the document.
    pub fn select(&self, path: &str) -> Vec<&Element> {
        path::select_from_document(&self.root, path)
    }

    /// Text of every element matched by `path`, in document order
    pub fn select_text(&self, path: &str) -> Vec<&str> {
        self.select(path).into_iter().map(Element::text).collect()
    }

    /// First element matched by `path`
    pub fn first(&self, path: &str) -> Option<&Element> {
        self.select(path).into_iter().next()
    }
}

impl Element {
    /// Create an empty element; used to assemble documents programmatically
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn from_start(start: &BytesStart) -> Result<Self> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

        for attr in start.attributes() {
            let attr = attr.map_err(|e| ELinkError::XmlError(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ELinkError::XmlError(e.to_string()))?
                .into_owned();
            element.attributes.insert(key, value);
        }

        Ok(element)
    }

    fn finish_text(&mut self) {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn has_element_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Every element below this one, in document order
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// Evaluate a path expression relative to this element
    pub fn select(&self, path: &str) -> Vec<&Element> {
        path::select_from_element(self, path)
    }

    pub fn select_text(&self, path: &str) -> Vec<&str> {
        self.select(path).into_iter().map(Element::text).collect()
    }

    /// Convert this sub-tree into a free-form record
    pub fn to_record(&self) -> Record {
        Record::from_element(self)
    }
}

fn collect_descendants<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    for child in &element.children {
        out.push(child);
        collect_descendants(child, out);
    }
}

/// Fail if the service reported a fault inside the document
///
/// EUtils signals request-level faults (bad database name, malformed ids, ...)
/// with an `<ERROR>` element while still answering HTTP 200. Documents that
/// carry one must never reach the shape parsers.
pub fn check_service_errors(document: &XmlDocument) -> Result<()> {
    let errors = document.select_text("//ERROR");
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| if e.is_empty() { "unspecified error" } else { e })
        .collect::<Vec<_>>()
        .join("; ");
    warn!(error_count = errors.len(), message = %message, "Service reported an error");

    Err(ELinkError::Upstream { message })
}
