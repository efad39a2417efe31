use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationRequest;
use crate::filter::Filter;
use crate::geo::GeoPoint;

const DEFAULT_TAKE: i64 = 20;

/// Engine-agnostic search request.
///
/// Paging values are passed to the engine as given; validating them is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub search_keywords: Option<String>,
    /// Fields the keywords are matched against. `None` searches all fields.
    pub search_fields: Option<Vec<String>>,
    pub is_fuzzy_search: bool,
    /// Explicit edit distance. `None` selects automatic fuzziness.
    pub fuzziness: Option<u32>,
    pub filter: Option<Filter>,
    pub sorting: Vec<SortingField>,
    pub skip: i64,
    pub take: i64,
    pub aggregations: Vec<AggregationRequest>,
    /// Source fields to return. `None` or empty returns the whole document.
    pub include_fields: Option<Vec<String>>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search_keywords: None,
            search_fields: None,
            is_fuzzy_search: false,
            fuzziness: None,
            filter: None,
            sorting: Vec::new(),
            skip: 0,
            take: DEFAULT_TAKE,
            aggregations: Vec::new(),
            include_fields: None,
        }
    }
}

/// A sort key. When `location` is set, documents are ordered by their
/// distance from that point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortingField {
    pub field_name: String,
    pub is_descending: bool,
    pub location: Option<GeoPoint>,
}

impl SortingField {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Default::default()
        }
    }

    pub fn geo_distance(field_name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            field_name: field_name.into(),
            is_descending: false,
            location: Some(location),
        }
    }

    pub fn descending(mut self) -> Self {
        self.is_descending = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let request: SearchRequest =
            serde_json::from_value(json!({ "searchKeywords": "red shoes" })).unwrap();

        assert_eq!(request.search_keywords.as_deref(), Some("red shoes"));
        assert_eq!(request.skip, 0);
        assert_eq!(request.take, 20);
        assert!(!request.is_fuzzy_search);
        assert!(request.aggregations.is_empty());
    }

    #[test]
    fn geo_sorting_carries_location() {
        let sort = SortingField::geo_distance("Location", GeoPoint::new(1.0, 2.0)).descending();
        assert!(sort.is_descending);
        assert_eq!(sort.location, Some(GeoPoint::new(1.0, 2.0)));
    }
}
