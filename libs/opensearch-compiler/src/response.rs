//! Response compiler
//!
//! Lifts a [`NativeSearchResult`] into a [`SearchResponse`]. Aggregations are
//! read back by walking the *request's* aggregation definitions and looking
//! up the keys the request compiler emitted for them.

use indexmap::IndexMap;
use search_model::{
    AggregationRequest, AggregationResponse, AggregationResponseValue, DocumentValue,
    SearchDocument, SearchRequest, SearchResponse,
};
use serde_json::{Map, Value};

use crate::naming::{composite_key, key_to_string};
use crate::result::{Aggregate, BucketAggregate, Hit, NativeSearchResult};

/// Stateless compiler from [`NativeSearchResult`] to [`SearchResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCompiler;

impl ResponseCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Never fails. A result without hits yields an empty response, whatever
    /// aggregations it carries; keys the engine omitted count as no matches.
    pub fn compile(
        &self,
        result: NativeSearchResult,
        request: Option<&SearchRequest>,
    ) -> SearchResponse {
        let total_count = result.total();
        if total_count == 0 {
            return SearchResponse::empty();
        }

        let documents: Vec<SearchDocument> =
            result.hits.hits.into_iter().map(to_search_document).collect();
        let aggregations = request
            .map(|r| collect_aggregations(&result.aggregations, &r.aggregations))
            .unwrap_or_default();

        tracing::debug!(
            total_count,
            documents = documents.len(),
            aggregations = aggregations.len(),
            "compiled search response"
        );

        SearchResponse {
            total_count,
            documents,
            aggregations,
        }
    }
}

pub fn to_search_document(hit: Hit) -> SearchDocument {
    let mut document = SearchDocument::new(hit.id);

    // A hit carries either a stored source or selected fields.
    if let Some(fields) = hit.source.or(hit.fields) {
        for (name, value) in fields {
            document.insert(name, normalize_value(value));
        }
    }

    document.set_relevance_score(hit.score);
    document
}

/// Convert a wire value: arrays become ordered lists, objects (top-level or
/// inside a list) become object maps, scalars pass through.
pub fn normalize_value(value: Value) -> DocumentValue {
    match value {
        Value::Null => DocumentValue::Null,
        Value::Bool(b) => DocumentValue::Bool(b),
        Value::Number(n) => DocumentValue::Number(n),
        Value::String(s) => DocumentValue::String(s),
        Value::Array(items) => DocumentValue::List(items.into_iter().map(normalize_value).collect()),
        Value::Object(map) => DocumentValue::Object(normalize_object(map)),
    }
}

fn normalize_object(map: Map<String, Value>) -> IndexMap<String, DocumentValue> {
    map.into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn collect_aggregations(
    native: &IndexMap<String, Aggregate>,
    requests: &[AggregationRequest],
) -> Vec<AggregationResponse> {
    let mut result = Vec::new();

    for request in requests {
        let id = request.effective_id();
        let mut values = Vec::new();

        match request {
            AggregationRequest::Term(_) => add_aggregation_values(native, id, id, &mut values),
            AggregationRequest::Range(range) => {
                for value in &range.values {
                    let response_key = composite_key(id, &value.id);
                    add_aggregation_values(native, &response_key, &value.id, &mut values);
                }
            }
        }

        if values.is_empty() {
            tracing::trace!(aggregation_id = id, "dropping aggregation without values");
            continue;
        }

        result.push(AggregationResponse {
            id: id.to_string(),
            values,
        });
    }

    result
}

/// Read the aggregate stored under `response_key`. A filter wrapper is
/// unwrapped one level when it nests buckets under the same key; otherwise its
/// own document count is reported as `value_id`.
fn add_aggregation_values(
    native: &IndexMap<String, Aggregate>,
    response_key: &str,
    value_id: &str,
    values: &mut Vec<AggregationResponseValue>,
) {
    let Some(aggregate) = native.get(response_key) else {
        return;
    };

    let buckets: Option<&BucketAggregate> = match aggregate {
        Aggregate::Buckets(buckets) => Some(buckets),
        Aggregate::SingleBucket(single) => match single.aggregations.get(response_key) {
            Some(Aggregate::Buckets(buckets)) => Some(buckets),
            Some(_) => None,
            None => {
                if single.doc_count > 0 {
                    values.push(AggregationResponseValue::new(value_id, single.doc_count));
                }
                None
            }
        },
        Aggregate::Other(_) => None,
    };

    if let Some(buckets) = buckets {
        values.extend(
            buckets
                .buckets
                .iter()
                .filter(|bucket| bucket.doc_count > 0)
                .map(|bucket| {
                    let id = bucket
                        .key_as_string
                        .clone()
                        .unwrap_or_else(|| key_to_string(&bucket.key));
                    AggregationResponseValue::new(id, bucket.doc_count)
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_model::{RangeAggregationRequest, RangeAggregationRequestValue, TermAggregationRequest};
    use serde_json::json;

    fn result(value: Value) -> NativeSearchResult {
        NativeSearchResult::from_value(value).unwrap()
    }

    fn request(aggregations: Vec<AggregationRequest>) -> SearchRequest {
        SearchRequest {
            aggregations,
            ..Default::default()
        }
    }

    fn term(field_name: &str) -> AggregationRequest {
        TermAggregationRequest {
            field_name: field_name.to_string(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn zero_hits_yield_empty_response() {
        let native = result(json!({
            "hits": { "total": { "value": 0 }, "hits": [] },
            "aggregations": { "Brand": { "buckets": [{ "key": "acme", "doc_count": 4 }] } }
        }));

        let response = ResponseCompiler.compile(native, Some(&request(vec![term("Brand")])));
        assert_eq!(response, SearchResponse::empty());
    }

    #[test]
    fn source_takes_precedence_over_fields() {
        let document = to_search_document(Hit {
            id: "1".to_string(),
            score: Some(2.0),
            source: Some(json!({ "name": "from source" }).as_object().unwrap().clone()),
            fields: Some(json!({ "name": ["from fields"] }).as_object().unwrap().clone()),
            ..Default::default()
        });

        assert_eq!(document.get("name").and_then(|v| v.as_str()), Some("from source"));
        assert_eq!(document.relevance_score(), Some(2.0));
    }

    #[test]
    fn selected_fields_are_used_without_source() {
        let document = to_search_document(Hit {
            id: "1".to_string(),
            fields: Some(json!({ "name": ["shoe"] }).as_object().unwrap().clone()),
            ..Default::default()
        });

        assert_eq!(
            document.get("name"),
            Some(&DocumentValue::List(vec!["shoe".into()]))
        );
        assert_eq!(document.relevance_score(), None);
    }

    #[test]
    fn values_normalize_lists_and_objects() {
        let value = normalize_value(json!([{ "code": "a" }, 3, "x"]));

        let DocumentValue::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items[0].as_object().map(|o| o.len()), Some(1));
        assert_eq!(items[1], DocumentValue::from(3i64));
        assert_eq!(items[2], DocumentValue::from("x"));

        let object = normalize_value(json!({ "city": "Berlin", "geo": { "lat": 1 } }));
        assert!(object.as_object().unwrap()["geo"].as_object().is_some());
    }

    #[test]
    fn term_buckets_skip_empty_counts() {
        let native = result(json!({
            "hits": { "total": { "value": 10 } },
            "aggregations": { "Brand": { "buckets": [
                { "key": "acme", "doc_count": 5 },
                { "key": "globex", "doc_count": 3 },
                { "key": 7, "doc_count": 2 },
                { "key": "initech", "doc_count": 0 }
            ] } }
        }));

        let response = ResponseCompiler.compile(native, Some(&request(vec![term("Brand")])));

        assert_eq!(
            response.aggregations,
            vec![AggregationResponse {
                id: "Brand".to_string(),
                values: vec![
                    AggregationResponseValue::new("acme", 5),
                    AggregationResponseValue::new("globex", 3),
                    AggregationResponseValue::new("7", 2),
                ],
            }]
        );
    }

    #[test]
    fn filtered_term_buckets_unwrap_one_level() {
        let native = result(json!({
            "hits": { "total": { "value": 10 } },
            "aggregations": { "Brand": {
                "doc_count": 6,
                "Brand": { "buckets": [{ "key": "acme", "key_as_string": "ACME", "doc_count": 6 }] }
            } }
        }));

        let response = ResponseCompiler.compile(native, Some(&request(vec![term("Brand")])));

        assert_eq!(
            response.aggregations[0].values,
            vec![AggregationResponseValue::new("ACME", 6)]
        );
    }

    #[test]
    fn range_values_correlate_through_composite_keys() {
        let range: AggregationRequest = RangeAggregationRequest {
            id: Some("price".to_string()),
            field_name: "Price".to_string(),
            values: ["low", "mid", "high"]
                .into_iter()
                .map(|id| RangeAggregationRequestValue {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            filter: None,
        }
        .into();
        let native = result(json!({
            "hits": { "total": { "value": 10 } },
            "aggregations": {
                "price-low": { "doc_count": 4 },
                "price-mid": { "doc_count": 0 }
            }
        }));

        let response = ResponseCompiler.compile(native, Some(&request(vec![range])));

        assert_eq!(
            response.aggregations,
            vec![AggregationResponse {
                id: "price".to_string(),
                values: vec![AggregationResponseValue::new("low", 4)],
            }]
        );
    }

    #[test]
    fn filtered_term_buckets_unwrap_under_reserved_looking_ids() {
        for id in ["meta", "buckets"] {
            let aggregation: AggregationRequest = TermAggregationRequest {
                id: Some(id.to_string()),
                field_name: "Brand".to_string(),
                filter: Some(search_model::Filter::term("Color", ["red"])),
                ..Default::default()
            }
            .into();
            let native = result(json!({
                "hits": { "total": { "value": 3 } },
                "aggregations": { id: {
                    "doc_count": 3,
                    id: { "buckets": [
                        { "key": "acme", "doc_count": 2 },
                        { "key": "globex", "doc_count": 1 }
                    ] }
                } }
            }));

            let response = ResponseCompiler.compile(native, Some(&request(vec![aggregation])));

            assert_eq!(
                response.aggregations,
                vec![AggregationResponse {
                    id: id.to_string(),
                    values: vec![
                        AggregationResponseValue::new("acme", 2),
                        AggregationResponseValue::new("globex", 1),
                    ],
                }],
                "aggregation id {id}"
            );
        }
    }

    #[test]
    fn range_values_read_nested_bucket_sets() {
        let range: AggregationRequest = RangeAggregationRequest {
            id: Some("price".to_string()),
            field_name: "Price".to_string(),
            values: ["low", "high"]
                .into_iter()
                .map(|id| RangeAggregationRequestValue {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            filter: None,
        }
        .into();
        let native = result(json!({
            "hits": { "total": { "value": 10 } },
            "aggregations": {
                "price-low": {
                    "doc_count": 5,
                    "price-low": { "buckets": [
                        { "key": "acme", "doc_count": 4 },
                        { "key": "globex", "doc_count": 0 }
                    ] }
                },
                "price-high": { "buckets": [
                    { "key": "initech", "doc_count": 0 },
                    { "key": "umbrella", "doc_count": 2 }
                ] }
            }
        }));

        let response = ResponseCompiler.compile(native, Some(&request(vec![range])));

        assert_eq!(
            response.aggregations,
            vec![AggregationResponse {
                id: "price".to_string(),
                values: vec![
                    AggregationResponseValue::new("acme", 4),
                    AggregationResponseValue::new("umbrella", 2),
                ],
            }]
        );
    }

    #[test]
    fn aggregations_without_values_are_dropped() {
        let native = result(json!({
            "hits": { "total": { "value": 1 } },
            "aggregations": { "Color": { "buckets": [{ "key": "red", "doc_count": 0 }] } }
        }));

        let response = ResponseCompiler.compile(
            native,
            Some(&request(vec![term("Color"), term("Missing")])),
        );
        assert!(response.aggregations.is_empty());
        assert_eq!(response.total_count, 1);
    }

    #[test]
    fn aggregations_without_request_are_ignored() {
        let native = result(json!({
            "hits": { "total": { "value": 1 }, "hits": [{ "_id": "a" }] },
            "aggregations": { "Color": { "buckets": [{ "key": "red", "doc_count": 1 }] } }
        }));

        let response = ResponseCompiler.compile(native, None);
        assert_eq!(response.documents.len(), 1);
        assert!(response.aggregations.is_empty());
    }
}
