use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub total_count: u64,
    pub documents: Vec<SearchDocument>,
    pub aggregations: Vec<AggregationResponse>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single search hit: its id, field values and relevance score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchDocument {
    pub id: String,
    pub fields: IndexMap<String, DocumentValue>,
    relevance_score: Option<f64>,
}

impl SearchDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: DocumentValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&DocumentValue> {
        self.fields.get(name)
    }

    pub fn relevance_score(&self) -> Option<f64> {
        self.relevance_score
    }

    pub fn set_relevance_score(&mut self, score: Option<f64>) {
        self.relevance_score = score;
    }
}

/// A document field value.
///
/// Lists keep the order the engine returned. Objects keep key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<DocumentValue>),
    Object(IndexMap<String, DocumentValue>),
}

impl DocumentValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DocumentValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, DocumentValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for DocumentValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DocumentValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DocumentValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Buckets computed for one requested aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationResponse {
    pub id: String,
    pub values: Vec<AggregationResponseValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationResponseValue {
    pub id: String,
    pub count: u64,
}

impl AggregationResponseValue {
    pub fn new(id: impl Into<String>, count: u64) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_value_round_trips_nested_json() {
        let value: DocumentValue = serde_json::from_value(json!({
            "name": "shoe",
            "sizes": [41, 42.5],
            "inStock": true,
            "vendor": null
        }))
        .unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object["name"].as_str(), Some("shoe"));
        assert_eq!(object["sizes"].as_list().map(<[_]>::len), Some(2));
        assert_eq!(object["inStock"], DocumentValue::Bool(true));
        assert!(object["vendor"].is_null());
    }

    #[test]
    fn relevance_score_slot_is_separate_from_fields() {
        let mut document = SearchDocument::new("42");
        document.insert("name", "shoe".into());
        document.set_relevance_score(Some(1.5));

        assert_eq!(document.relevance_score(), Some(1.5));
        assert_eq!(document.fields.len(), 1);
    }
}
