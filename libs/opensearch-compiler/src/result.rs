//! OpenSearch `_search` response
//!
//! Only the parts the response compiler reads are typed. Aggregations are
//! classified by shape, since the response does not say which kind of
//! aggregation produced them:
//! - an object with `doc_count` is a single-bucket aggregate (filter), whose
//!   object-valued entries are its sub-aggregations, whatever their names
//! - an object with `buckets` is a multi-bucket aggregate (terms, range)
//!
//! Multi-bucket aggregates never carry a top-level `doc_count`, so a filter
//! wrapping a sub-aggregation named `buckets` is still a single bucket.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NativeSearchResult {
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub hits: HitsMetadata,
    #[serde(default)]
    pub aggregations: IndexMap<String, Aggregate>,
}

impl NativeSearchResult {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map_or(0, TotalHits::value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HitsMetadata {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total` is a bare number on old engines and `{value, relation}` on
/// current ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Tracked {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(value) | Self::Tracked { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Buckets(BucketAggregate),
    SingleBucket(SingleBucketAggregate),
    Other(Value),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketAggregate {
    pub buckets: Vec<KeyedBucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedBucket {
    pub key: Value,
    pub key_as_string: Option<String>,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleBucketAggregate {
    pub doc_count: u64,
    pub aggregations: IndexMap<String, Aggregate>,
}

impl Aggregate {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::Other(value);
        };

        if let Some(doc_count) = object.get("doc_count").and_then(Value::as_u64) {
            let aggregations = object
                .into_iter()
                .filter(|(_, value)| value.is_object())
                .map(|(name, value)| (name, Self::from_value(value)))
                .collect();
            return Self::SingleBucket(SingleBucketAggregate {
                doc_count,
                aggregations,
            });
        }

        match object.remove("buckets") {
            Some(buckets) => Self::Buckets(BucketAggregate {
                buckets: parse_buckets(buckets),
            }),
            None => Self::Other(Value::Object(object)),
        }
    }
}

impl<'de> Deserialize<'de> for Aggregate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Buckets arrive as an array, or as an object keyed by bucket key when the
/// aggregation was requested with `keyed: true`.
fn parse_buckets(buckets: Value) -> Vec<KeyedBucket> {
    match buckets {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| parse_bucket(None, item))
            .collect(),
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, item)| parse_bucket(Some(key), item))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_bucket(map_key: Option<String>, item: Value) -> Option<KeyedBucket> {
    let Value::Object(mut bucket) = item else {
        return None;
    };

    let key = match bucket.remove("key") {
        Some(key) => key,
        None => Value::String(map_key?),
    };

    Some(KeyedBucket {
        key,
        key_as_string: bucket
            .remove("key_as_string")
            .and_then(|k| k.as_str().map(str::to_string)),
        doc_count: bucket.get("doc_count").and_then(Value::as_u64).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_total_in_both_shapes() {
        let modern =
            NativeSearchResult::from_value(json!({ "hits": { "total": { "value": 7, "relation": "eq" } } }))
                .unwrap();
        let legacy = NativeSearchResult::from_value(json!({ "hits": { "total": 3 } })).unwrap();
        let missing = NativeSearchResult::from_value(json!({})).unwrap();

        assert_eq!(modern.total(), 7);
        assert_eq!(legacy.total(), 3);
        assert_eq!(missing.total(), 0);
    }

    #[test]
    fn classifies_aggregates_by_shape() {
        let result = NativeSearchResult::from_value(json!({
            "aggregations": {
                "brand": {
                    "doc_count_error_upper_bound": 0,
                    "sum_other_doc_count": 0,
                    "buckets": [
                        { "key": "acme", "doc_count": 3 },
                        { "key": 1700000000000i64, "key_as_string": "2023-11-14", "doc_count": 1 }
                    ]
                },
                "color": {
                    "doc_count": 4,
                    "meta": { "owner": "facets" },
                    "color": { "buckets": [{ "key": "red", "doc_count": 4 }] }
                },
                "price-low": { "doc_count": 2 },
                "stats": { "value": 12.5 }
            }
        }))
        .unwrap();

        let Aggregate::Buckets(brand) = &result.aggregations["brand"] else {
            panic!("expected buckets");
        };
        assert_eq!(brand.buckets.len(), 2);
        assert_eq!(brand.buckets[1].key_as_string.as_deref(), Some("2023-11-14"));

        let Aggregate::SingleBucket(color) = &result.aggregations["color"] else {
            panic!("expected single bucket");
        };
        assert_eq!(color.doc_count, 4);
        assert_eq!(color.aggregations.len(), 2);
        assert!(matches!(color.aggregations["color"], Aggregate::Buckets(_)));
        assert!(matches!(color.aggregations["meta"], Aggregate::Other(_)));

        assert_eq!(
            result.aggregations["price-low"],
            Aggregate::SingleBucket(SingleBucketAggregate {
                doc_count: 2,
                aggregations: IndexMap::new(),
            })
        );
        assert!(matches!(result.aggregations["stats"], Aggregate::Other(_)));
    }

    #[test]
    fn filter_wrapper_keeps_sub_aggregation_named_buckets() {
        let aggregate = Aggregate::from_value(json!({
            "doc_count": 3,
            "buckets": { "buckets": [{ "key": "acme", "doc_count": 3 }] }
        }));

        let Aggregate::SingleBucket(wrapper) = aggregate else {
            panic!("expected single bucket");
        };
        assert_eq!(wrapper.doc_count, 3);
        let Aggregate::Buckets(inner) = &wrapper.aggregations["buckets"] else {
            panic!("expected nested buckets");
        };
        assert_eq!(inner.buckets.len(), 1);
    }

    #[test]
    fn keyed_buckets_take_key_from_map() {
        let aggregate = Aggregate::from_value(json!({
            "buckets": { "cheap": { "doc_count": 5 } }
        }));

        assert_eq!(
            aggregate,
            Aggregate::Buckets(BucketAggregate {
                buckets: vec![KeyedBucket {
                    key: json!("cheap"),
                    key_as_string: None,
                    doc_count: 5,
                }]
            })
        );
    }

    #[test]
    fn hits_keep_source_and_fields() {
        let result = NativeSearchResult::from_slice(
            br#"{"hits":{"total":{"value":1},"hits":[
                {"_index":"products","_id":"1","_score":1.5,"_source":{"name":"shoe"},"fields":{"name":["shoe"]}}
            ]}}"#,
        )
        .unwrap();

        let hit = &result.hits.hits[0];
        assert_eq!(hit.id, "1");
        assert_eq!(hit.score, Some(1.5));
        assert!(hit.source.is_some());
        assert!(hit.fields.is_some());
    }
}
