//! Field catalog
//!
//! Read-only view of the fields an index declares. Both compilers consult it:
//! term filters normalize boolean values, aggregations redirect to the `raw`
//! keyword sibling when one exists. Lookups ignore case.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::naming::{to_field_name, RAW_SUBFIELD};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Keyword,
    Boolean,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Date,
    GeoPoint,
    Object,
    Nested,
    Other(String),
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "keyword" => Self::Keyword,
            "boolean" => Self::Boolean,
            "long" => Self::Long,
            "integer" => Self::Integer,
            "short" => Self::Short,
            "byte" => Self::Byte,
            "double" => Self::Double,
            "float" => Self::Float,
            "date" => Self::Date,
            "geo_point" => Self::GeoPoint,
            "object" => Self::Object,
            "nested" => Self::Nested,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Boolean => "boolean",
            Self::Long => "long",
            Self::Integer => "integer",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::Double => "double",
            Self::Float => "float",
            Self::Date => "date",
            Self::GeoPoint => "geo_point",
            Self::Object => "object",
            Self::Nested => "nested",
            Self::Other(name) => name,
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    /// The field has an unanalyzed `raw` keyword sibling.
    pub has_raw_sibling: bool,
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            has_raw_sibling: false,
        }
    }

    pub fn with_raw_sibling(mut self) -> Self {
        self.has_raw_sibling = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, descriptor: FieldDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    pub fn insert(&mut self, name: &str, descriptor: FieldDescriptor) {
        self.fields.insert(to_field_name(name), descriptor);
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(&to_field_name(name))
    }

    pub fn is_boolean(&self, name: &str) -> bool {
        self.lookup(name)
            .is_some_and(|f| f.field_type == FieldType::Boolean)
    }

    pub fn has_raw_sibling(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|f| f.has_raw_sibling)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a catalog from an index mapping.
    ///
    /// Accepts a bare `{"properties": ..}` object, a `{"mappings": ..}`
    /// wrapper, or a full `GET /{index}/_mapping` response. Object properties
    /// contribute their children under dotted names.
    pub fn from_mapping(mapping: &Value) -> Result<Self> {
        let properties = find_properties(mapping).ok_or_else(|| {
            Error::InvalidMapping("expected an object with 'properties'".to_string())
        })?;

        let mut catalog = Self::new();
        if let Some(properties) = properties {
            collect_properties(&mut catalog, None, properties);
        }
        Ok(catalog)
    }
}

/// `Some(None)` is a mapping that declares no fields yet, as returned for a
/// freshly created index.
fn find_properties(mapping: &Value) -> Option<Option<&Map<String, Value>>> {
    let object = mapping.as_object()?;

    if let Some(properties) = object.get("properties") {
        return properties.as_object().map(Some);
    }
    if let Some(mappings) = object.get("mappings") {
        return match mappings.as_object()?.get("properties") {
            Some(properties) => properties.as_object().map(Some),
            None => Some(None),
        };
    }

    // `_mapping` responses are keyed by index name.
    match object.values().next() {
        Some(index) if object.len() == 1 => find_properties(index),
        _ => None,
    }
}

fn collect_properties(
    catalog: &mut FieldCatalog,
    prefix: Option<&str>,
    properties: &Map<String, Value>,
) {
    for (name, property) in properties {
        let full_name = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };

        let children = property.get("properties").and_then(Value::as_object);
        let field_type = match property.get("type").and_then(Value::as_str) {
            Some(t) => FieldType::parse(t),
            None if children.is_some() => FieldType::Object,
            None => continue,
        };

        let has_raw_sibling = field_type == FieldType::Keyword
            && property
                .get("fields")
                .and_then(|f| f.get(RAW_SUBFIELD))
                .is_some();

        catalog.insert(
            &full_name,
            FieldDescriptor {
                field_type,
                has_raw_sibling,
            },
        );

        if let Some(children) = children {
            collect_properties(catalog, Some(&full_name), children);
        }
    }
}
