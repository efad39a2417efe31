use search_model::{
    AggregationRequest, RangeAggregationRequest, RangeAggregationRequestValue, SearchRequest,
    TermAggregationRequest,
};

use super::filter::lower_optional_filter;
use crate::catalog::FieldCatalog;
use crate::naming::{composite_key, raw_field_name, to_field_name};
use crate::query::{
    Aggregation, AggregationMap, BoolQuery, FilterAggregation, Query, RangeBounds, RangeQuery,
    TermsAggregation,
};

/// Bucket cap sent for term aggregations without a size. The engine has no
/// "unlimited" value, so the largest count it accepts stands in for it.
pub const UNBOUNDED_BUCKET_COUNT: u32 = i32::MAX as u32;

/// Lower every requested aggregation, keyed by effective id.
///
/// Range aggregations contribute one entry per value under
/// [`composite_key`]. Returns `None` when nothing was emitted.
pub fn lower_aggregations(
    request: &SearchRequest,
    fields: &FieldCatalog,
) -> Option<AggregationMap> {
    let mut result = AggregationMap::new();

    for aggregation in &request.aggregations {
        let aggregation_id = aggregation.effective_id();

        let mut field_name = to_field_name(aggregation.field_name());
        if fields.has_raw_sibling(&field_name) {
            field_name = raw_field_name(&field_name);
        }

        let filter = lower_optional_filter(aggregation.filter(), fields);

        match aggregation {
            AggregationRequest::Term(term) => {
                add_term_aggregation(&mut result, aggregation_id, &field_name, filter, term)
            }
            AggregationRequest::Range(range) => {
                add_range_aggregation(&mut result, aggregation_id, &field_name, filter, range)
            }
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

fn add_term_aggregation(
    container: &mut AggregationMap,
    aggregation_id: &str,
    field_name: &str,
    filter: Option<Query>,
    request: &TermAggregationRequest,
) {
    let terms = (!field_name.is_empty()).then(|| TermsAggregation {
        field: field_name.to_string(),
        size: Some(bucket_count(request.size)),
        include: request.values.clone().filter(|values| !values.is_empty()),
    });

    let aggregation = match (filter, terms) {
        (None, None) => {
            tracing::debug!(
                aggregation_id,
                "skipping term aggregation without field or filter"
            );
            return;
        }
        (None, Some(terms)) => Aggregation::Terms(terms),
        (Some(filter), terms) => {
            let mut aggregations = AggregationMap::new();
            if let Some(terms) = terms {
                aggregations.insert(aggregation_id.to_string(), Aggregation::Terms(terms));
            }
            Aggregation::Filter(FilterAggregation {
                filter,
                aggregations,
            })
        }
    };

    insert(container, aggregation_id.to_string(), aggregation);
}

fn add_range_aggregation(
    container: &mut AggregationMap,
    aggregation_id: &str,
    field_name: &str,
    filter: Option<Query>,
    request: &RangeAggregationRequest,
) {
    for value in &request.values {
        let mut must = vec![range_bucket_query(field_name, value)];
        must.extend(filter.clone());

        let aggregation = Aggregation::Filter(FilterAggregation {
            filter: Query::Bool(BoolQuery {
                must,
                ..Default::default()
            }),
            aggregations: AggregationMap::new(),
        });

        insert(container, composite_key(aggregation_id, &value.id), aggregation);
    }
}

fn range_bucket_query(field_name: &str, value: &RangeAggregationRequestValue) -> Query {
    Query::Range(RangeQuery {
        field: field_name.to_string(),
        bounds: RangeBounds::new(
            value.lower_bound(),
            value.upper_bound(),
            value.include_lower,
            value.include_upper,
        ),
    })
}

fn bucket_count(size: Option<i32>) -> u32 {
    match size {
        Some(size) if size > 0 => size as u32,
        _ => UNBOUNDED_BUCKET_COUNT,
    }
}

fn insert(container: &mut AggregationMap, key: String, aggregation: Aggregation) {
    if container.contains_key(&key) {
        tracing::warn!(key = %key, "duplicate aggregation id, keeping the first definition");
        return;
    }
    container.insert(key, aggregation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDescriptor, FieldType};
    use search_model::Filter;
    use serde_json::json;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new()
            .with_field(
                "brand",
                FieldDescriptor::new(FieldType::Keyword).with_raw_sibling(),
            )
            .with_field("price", FieldDescriptor::new(FieldType::Double))
    }

    fn lower(aggregations: Vec<AggregationRequest>) -> Option<serde_json::Value> {
        let request = SearchRequest {
            aggregations,
            ..Default::default()
        };
        lower_aggregations(&request, &catalog()).map(|a| serde_json::to_value(a).unwrap())
    }

    fn range_value(id: &str, lower: &str, upper: &str) -> RangeAggregationRequestValue {
        RangeAggregationRequestValue {
            id: id.to_string(),
            lower: Some(lower.to_string()),
            upper: Some(upper.to_string()),
            include_lower: true,
            include_upper: false,
        }
    }

    #[test]
    fn no_aggregations_is_none() {
        assert_eq!(lower(vec![]), None);
    }

    #[test]
    fn term_aggregation_redirects_to_raw_sibling() {
        let lowered = lower(vec![TermAggregationRequest {
            field_name: "Brand".to_string(),
            size: Some(0),
            ..Default::default()
        }
        .into()]);

        assert_eq!(
            lowered,
            Some(json!({
                "Brand": { "terms": { "field": "brand.raw", "size": 2147483647 } }
            }))
        );
    }

    #[test]
    fn term_aggregation_size_and_allow_list() {
        let lowered = lower(vec![TermAggregationRequest {
            id: Some("colors".to_string()),
            field_name: "Color".to_string(),
            size: Some(5),
            values: Some(vec!["red".to_string(), "blue".to_string()]),
            filter: None,
        }
        .into()]);

        assert_eq!(
            lowered,
            Some(json!({
                "colors": { "terms": {
                    "field": "color",
                    "size": 5,
                    "include": ["red", "blue"]
                } }
            }))
        );
    }

    #[test]
    fn absent_size_is_unbounded() {
        assert_eq!(bucket_count(None), UNBOUNDED_BUCKET_COUNT);
        assert_eq!(bucket_count(Some(-3)), UNBOUNDED_BUCKET_COUNT);
        assert_eq!(bucket_count(Some(12)), 12);
    }

    #[test]
    fn filtered_term_aggregation_is_wrapped_under_same_id() {
        let lowered = lower(vec![TermAggregationRequest {
            field_name: "Brand".to_string(),
            size: Some(10),
            filter: Some(Filter::term("Color", ["red"])),
            ..Default::default()
        }
        .into()]);

        assert_eq!(
            lowered,
            Some(json!({
                "Brand": {
                    "filter": { "terms": { "color": ["red"] } },
                    "aggs": {
                        "Brand": { "terms": { "field": "brand.raw", "size": 10 } }
                    }
                }
            }))
        );
    }

    #[test]
    fn term_aggregation_without_field_or_filter_is_skipped() {
        assert_eq!(
            lower(vec![TermAggregationRequest {
                id: Some("empty".to_string()),
                ..Default::default()
            }
            .into()]),
            None
        );
    }

    #[test]
    fn range_aggregation_emits_composite_keys() {
        let lowered = lower(vec![RangeAggregationRequest {
            id: Some("price".to_string()),
            field_name: "Price".to_string(),
            values: vec![range_value("low", "", "100"), range_value("high", "100", "")],
            filter: Some(Filter::term("Color", ["red"])),
        }
        .into()]);

        assert_eq!(
            lowered,
            Some(json!({
                "price-low": { "filter": { "bool": { "must": [
                    { "range": { "price": { "lt": "100" } } },
                    { "terms": { "color": ["red"] } }
                ] } } },
                "price-high": { "filter": { "bool": { "must": [
                    { "range": { "price": { "gte": "100" } } },
                    { "terms": { "color": ["red"] } }
                ] } } }
            }))
        );
    }

    #[test]
    fn unfiltered_range_aggregation_checks_bounds_only() {
        let lowered = lower(vec![RangeAggregationRequest {
            field_name: "Price".to_string(),
            values: vec![range_value("mid", "10", "20")],
            ..Default::default()
        }
        .into()]);

        assert_eq!(
            lowered,
            Some(json!({
                "Price-mid": { "filter": { "bool": { "must": [
                    { "range": { "price": { "gte": "10", "lt": "20" } } }
                ] } } }
            }))
        );
    }

    #[test]
    fn duplicate_ids_keep_first_definition() {
        let lowered = lower(vec![
            TermAggregationRequest {
                field_name: "Color".to_string(),
                size: Some(1),
                ..Default::default()
            }
            .into(),
            TermAggregationRequest {
                field_name: "Color".to_string(),
                size: Some(2),
                ..Default::default()
            }
            .into(),
        ]);

        assert_eq!(
            lowered,
            Some(json!({ "Color": { "terms": { "field": "color", "size": 1 } } }))
        );
    }
}
