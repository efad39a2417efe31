//! Filter tree
//!
//! A closed set of leaf predicates (ids, term, range, geo distance, wildcard)
//! combined with `and` / `or` / `not`. Providers lower the tree by
//! exhaustive matching, so adding a variant is a compile error everywhere a
//! filter is translated.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    Ids(IdsFilter),
    Term(TermFilter),
    Range(RangeFilter),
    GeoDistance(GeoDistanceFilter),
    #[serde(rename = "wildcard")]
    WildCardTerm(WildCardTermFilter),
    Not(NotFilter),
    And(AndFilter),
    Or(OrFilter),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdsFilter {
    pub values: Vec<String>,
}

/// Exact match against any of `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermFilter {
    pub field_name: String,
    pub values: Vec<String>,
}

/// Matches when the field falls into any of the listed ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub field_name: String,
    pub values: Vec<RangeFilterValue>,
}

/// One range bound pair. A missing or empty bound leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeFilterValue {
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl RangeFilterValue {
    pub fn lower_bound(&self) -> Option<&str> {
        self.lower.as_deref().filter(|v| !v.is_empty())
    }

    pub fn upper_bound(&self) -> Option<&str> {
        self.upper.as_deref().filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDistanceFilter {
    pub field_name: String,
    pub location: GeoPoint,
    /// Radius in kilometers.
    pub distance: f64,
}

/// Glob-style match (`*` and `?`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildCardTermFilter {
    pub field_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFilter {
    #[serde(default)]
    pub child_filter: Option<Box<Filter>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndFilter {
    #[serde(default)]
    pub child_filters: Vec<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrFilter {
    #[serde(default)]
    pub child_filters: Vec<Filter>,
}

impl Filter {
    pub fn ids<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(IdsFilter {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn term<I, S>(field_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Term(TermFilter {
            field_name: field_name.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn range(field_name: impl Into<String>, values: Vec<RangeFilterValue>) -> Self {
        Self::Range(RangeFilter {
            field_name: field_name.into(),
            values,
        })
    }

    pub fn geo_distance(field_name: impl Into<String>, location: GeoPoint, distance: f64) -> Self {
        Self::GeoDistance(GeoDistanceFilter {
            field_name: field_name.into(),
            location,
            distance,
        })
    }

    pub fn wildcard(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::WildCardTerm(WildCardTermFilter {
            field_name: field_name.into(),
            value: value.into(),
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Filter) -> Self {
        Self::Not(NotFilter {
            child_filter: Some(Box::new(child)),
        })
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Self::And(AndFilter {
            child_filters: children,
        })
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Self::Or(OrFilter {
            child_filters: children,
        })
    }
}
