//! Free-form records for response items without a fixed schema
//!
//! Availability-check and linkout items carry whatever fields the provider
//! supplies, so they are kept as ordered `(name, value)` lists instead of
//! structs. Repeated field names (several `<Attribute>` children, say) are
//! preserved.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Element;

/// Value of one record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Record(Record),
}

/// Ordered field-name to value mapping built from an XML sub-tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: IndexMap<String, String>,
    fields: Vec<(String, FieldValue)>,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(record) => Some(record),
            FieldValue::Text(_) => None,
        }
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert an element's children into fields
    ///
    /// Children with element children of their own become nested records;
    /// leaves become text. XML attributes on leaf children are not kept, those
    /// on `element` itself are.
    pub fn from_element(element: &Element) -> Self {
        let fields = element
            .children()
            .iter()
            .map(|child| {
                let value = if child.has_element_children() {
                    FieldValue::Record(Record::from_element(child))
                } else {
                    FieldValue::Text(child.text().to_string())
                };
                (child.name().to_string(), value)
            })
            .collect();

        Self {
            attributes: element.attributes().clone(),
            fields,
        }
    }

    /// Append a field, keeping any earlier field of the same name
    pub fn push<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    pub fn with_text<S: Into<String>, T: Into<String>>(mut self, name: S, text: T) -> Self {
        self.push(name, FieldValue::Text(text.into()));
        self
    }

    pub fn with_record<S: Into<String>>(mut self, name: S, record: Record) -> Self {
        self.push(name, FieldValue::Record(record));
        self
    }

    /// First field with the given name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Every field with the given name, in document order
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a FieldValue> {
        self.fields
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text of the first field with the given name, if it is a leaf
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// First nested record with the given name
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.get_all(name).find_map(FieldValue::as_record)
    }

    /// Follow nested records by name and read the final leaf
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for name in parents {
            current = current.record(name)?;
        }
        current.text(last)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    /// Serialized as a map; XML attributes are prefixed with `@`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + self.fields.len()))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(&format!("@{name}"), value)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
