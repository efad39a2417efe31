//! OpenSearch query DSL
//!
//! Typed wire-level request body. Everything here serializes to the JSON the
//! `_search` endpoint accepts; nothing is ever deserialized back.

use indexmap::IndexMap;
use search_model::GeoPoint;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::FieldType;

/// Compiled search: the target index plus the `_search` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NativeQuery {
    #[serde(skip)]
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_filter: Option<Query>,
    #[serde(rename = "aggs", skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<AggregationMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Sort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_scores: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,
}

impl NativeQuery {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFilter {
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    MatchAll(MatchAllQuery),
    MatchNone(MatchNoneQuery),
    Bool(BoolQuery),
    Ids(IdsQuery),
    Terms(TermsQuery),
    Range(RangeQuery),
    GeoDistance(GeoDistanceQuery),
    Wildcard(WildcardQuery),
    MultiMatch(MultiMatchQuery),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAllQuery {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchNoneQuery {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    fn is_conjunction(&self) -> bool {
        !self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    fn is_disjunction(&self) -> bool {
        !self.should.is_empty() && self.must.is_empty() && self.must_not.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdsQuery {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub bounds: RangeBounds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
}

impl RangeBounds {
    /// Bounds from optional endpoints; `None` leaves that side open.
    pub fn new(
        lower: Option<&str>,
        upper: Option<&str>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        let lower = lower.map(str::to_string);
        let upper = upper.map(str::to_string);
        let (gt, gte) = if include_lower {
            (None, lower)
        } else {
            (lower, None)
        };
        let (lt, lte) = if include_upper {
            (None, upper)
        } else {
            (upper, None)
        };
        Self { gt, gte, lt, lte }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoDistanceQuery {
    pub field: String,
    pub location: GeoPoint,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WildcardQuery {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiMatchQuery {
    pub query: String,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

/// Term-length thresholds for automatic fuzziness: terms shorter than `low`
/// must match exactly, terms shorter than `high` allow one edit, longer
/// terms allow two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoFuzziness {
    pub low: u32,
    pub high: u32,
}

impl Default for AutoFuzziness {
    fn default() -> Self {
        Self { low: 3, high: 6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    EditDistance(u32),
    Auto(AutoFuzziness),
}

impl Serialize for Fuzziness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::EditDistance(distance) => serializer.serialize_u32(*distance),
            Self::Auto(thresholds) if *thresholds == AutoFuzziness::default() => {
                serializer.serialize_str("AUTO")
            }
            Self::Auto(AutoFuzziness { low, high }) => {
                serializer.serialize_str(&format!("AUTO:{low},{high}"))
            }
        }
    }
}

impl Query {
    pub fn match_all() -> Self {
        Self::MatchAll(MatchAllQuery {})
    }

    pub fn match_none() -> Self {
        Self::MatchNone(MatchNoneQuery {})
    }

    /// Intersection. `match_all` is the identity; nested conjunctions are
    /// flattened into one `bool.must`.
    pub fn and(self, other: Query) -> Query {
        match (self, other) {
            (Query::MatchAll(_), q) | (q, Query::MatchAll(_)) => q,
            (Query::Bool(mut a), Query::Bool(b)) if a.is_conjunction() && b.is_conjunction() => {
                a.must.extend(b.must);
                Query::Bool(a)
            }
            (Query::Bool(mut a), q) if a.is_conjunction() => {
                a.must.push(q);
                Query::Bool(a)
            }
            (a, b) => Query::Bool(BoolQuery {
                must: vec![a, b],
                ..Default::default()
            }),
        }
    }

    /// Union. `match_none` is the identity; nested disjunctions are
    /// flattened into one `bool.should`.
    pub fn or(self, other: Query) -> Query {
        match (self, other) {
            (Query::MatchNone(_), q) | (q, Query::MatchNone(_)) => q,
            (Query::Bool(mut a), Query::Bool(b)) if a.is_disjunction() && b.is_disjunction() => {
                a.should.extend(b.should);
                Query::Bool(a)
            }
            (Query::Bool(mut a), q) if a.is_disjunction() => {
                a.should.push(q);
                Query::Bool(a)
            }
            (a, b) => Query::Bool(BoolQuery {
                should: vec![a, b],
                minimum_should_match: Some(1),
                ..Default::default()
            }),
        }
    }

    pub fn negate(self) -> Query {
        Query::Bool(BoolQuery {
            must_not: vec![self],
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_descending(is_descending: bool) -> Self {
        if is_descending {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sort {
    Field(FieldSort),
    Score(SortOrder),
    GeoDistance(GeoDistanceSort),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSort {
    pub field: String,
    pub order: SortOrder,
    /// `"_last"` or `"_first"`.
    pub missing: Option<String>,
    /// Type assumed when the field is absent from the mapping.
    pub unmapped_type: Option<FieldType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoDistanceSort {
    pub field: String,
    pub points: Vec<GeoPoint>,
    pub order: SortOrder,
}

pub type AggregationMap = IndexMap<String, Aggregation>;

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Terms(TermsAggregation),
    Filter(FilterAggregation),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsAggregation {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterAggregation {
    pub filter: Query,
    pub aggregations: AggregationMap,
}

// Serialization of clauses keyed by a field name, e.g. `{"terms": {"color": [..]}}`.

#[derive(Serialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl From<&GeoPoint> for LatLon {
    fn from(point: &GeoPoint) -> Self {
        Self {
            lat: point.latitude,
            lon: point.longitude,
        }
    }
}

fn serialize_keyed<S, T>(serializer: S, key: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl Serialize for TermsQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_keyed(serializer, &self.field, &self.values)
    }
}

impl Serialize for RangeQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_keyed(serializer, &self.field, &self.bounds)
    }
}

impl Serialize for WildcardQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Pattern<'a> {
            value: &'a str,
        }
        serialize_keyed(serializer, &self.field, &Pattern { value: &self.value })
    }
}

impl Serialize for GeoDistanceQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("distance", &format!("{}km", self.distance_km))?;
        map.serialize_entry(&self.field, &LatLon::from(&self.location))?;
        map.end()
    }
}

impl Serialize for Sort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Options<'a> {
            order: SortOrder,
            #[serde(skip_serializing_if = "Option::is_none")]
            missing: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            unmapped_type: Option<&'a FieldType>,
        }

        match self {
            Sort::Field(sort) => serialize_keyed(
                serializer,
                &sort.field,
                &Options {
                    order: sort.order,
                    missing: sort.missing.as_deref(),
                    unmapped_type: sort.unmapped_type.as_ref(),
                },
            ),
            Sort::Score(order) => serialize_keyed(
                serializer,
                "_score",
                &Options {
                    order: *order,
                    missing: None,
                    unmapped_type: None,
                },
            ),
            Sort::GeoDistance(sort) => {
                struct Body<'a>(&'a GeoDistanceSort);

                impl Serialize for Body<'_> {
                    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                        let points: Vec<LatLon> = self.0.points.iter().map(LatLon::from).collect();
                        let mut map = serializer.serialize_map(Some(3))?;
                        map.serialize_entry(&self.0.field, &points)?;
                        map.serialize_entry("order", &self.0.order)?;
                        map.serialize_entry("unit", "km")?;
                        map.end()
                    }
                }

                serialize_keyed(serializer, "_geo_distance", &Body(sort))
            }
        }
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Aggregation::Terms(terms) => serialize_keyed(serializer, "terms", terms),
            Aggregation::Filter(filter) => {
                let nested = !filter.aggregations.is_empty();
                let mut map = serializer.serialize_map(Some(1 + usize::from(nested)))?;
                map.serialize_entry("filter", &filter.filter)?;
                if nested {
                    map.serialize_entry("aggs", &filter.aggregations)?;
                }
                map.end()
            }
        }
    }
}
