use serde::{Deserialize, Serialize};

use crate::filter::Filter;

/// A facet requested alongside the search.
///
/// The effective id ([`AggregationRequest::effective_id`]) is the explicit
/// `id` when present, otherwise the field name. Responses are keyed by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AggregationRequest {
    Term(TermAggregationRequest),
    Range(RangeAggregationRequest),
}

/// One bucket per distinct field value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermAggregationRequest {
    pub id: Option<String>,
    pub field_name: String,
    /// Maximum number of buckets. Absent or zero means no cap.
    pub size: Option<i32>,
    /// Restrict buckets to exactly these values.
    pub values: Option<Vec<String>>,
    /// Documents must pass this filter before they are bucketed.
    pub filter: Option<Filter>,
}

/// One bucket per named range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeAggregationRequest {
    pub id: Option<String>,
    pub field_name: String,
    pub values: Vec<RangeAggregationRequestValue>,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeAggregationRequestValue {
    pub id: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl RangeAggregationRequestValue {
    pub fn lower_bound(&self) -> Option<&str> {
        self.lower.as_deref().filter(|v| !v.is_empty())
    }

    pub fn upper_bound(&self) -> Option<&str> {
        self.upper.as_deref().filter(|v| !v.is_empty())
    }
}

impl AggregationRequest {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Term(t) => t.id.as_deref(),
            Self::Range(r) => r.id.as_deref(),
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            Self::Term(t) => &t.field_name,
            Self::Range(r) => &r.field_name,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Term(t) => t.filter.as_ref(),
            Self::Range(r) => r.filter.as_ref(),
        }
    }

    pub fn effective_id(&self) -> &str {
        self.id().unwrap_or_else(|| self.field_name())
    }
}

impl From<TermAggregationRequest> for AggregationRequest {
    fn from(value: TermAggregationRequest) -> Self {
        Self::Term(value)
    }
}

impl From<RangeAggregationRequest> for AggregationRequest {
    fn from(value: RangeAggregationRequest) -> Self {
        Self::Range(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_id_falls_back_to_field_name() {
        let named: AggregationRequest = TermAggregationRequest {
            id: Some("brands".to_string()),
            field_name: "Brand".to_string(),
            ..Default::default()
        }
        .into();
        let unnamed: AggregationRequest = RangeAggregationRequest {
            field_name: "Price".to_string(),
            ..Default::default()
        }
        .into();

        assert_eq!(named.effective_id(), "brands");
        assert_eq!(unnamed.effective_id(), "Price");
    }

    #[test]
    fn blank_range_bounds_are_open() {
        let value = RangeAggregationRequestValue {
            id: "low".to_string(),
            lower: Some(String::new()),
            upper: Some("100".to_string()),
            ..Default::default()
        };
        assert_eq!(value.lower_bound(), None);
        assert_eq!(value.upper_bound(), Some("100"));
    }
}
