//! Engine-agnostic search model
//!
//! Value types shared by callers and search providers:
//! - [`SearchRequest`]: keywords, a [`Filter`] tree, sorting, paging,
//!   aggregations and field projection
//! - [`SearchResponse`]: total count, [`SearchDocument`]s and
//!   [`AggregationResponse`]s
//!
//! All types are plain data. They carry no engine specifics and are
//! (de)serialized as camelCase JSON.
#![forbid(unsafe_code)]

pub mod aggregation;
pub mod error;
pub mod filter;
pub mod geo;
pub mod request;
pub mod response;

pub use aggregation::{
    AggregationRequest, RangeAggregationRequest, RangeAggregationRequestValue,
    TermAggregationRequest,
};
pub use error::{Error, Result};
pub use filter::{
    AndFilter, Filter, GeoDistanceFilter, IdsFilter, NotFilter, OrFilter, RangeFilter,
    RangeFilterValue, TermFilter, WildCardTermFilter,
};
pub use geo::GeoPoint;
pub use request::{SearchRequest, SortingField};
pub use response::{
    AggregationResponse, AggregationResponseValue, DocumentValue, SearchDocument, SearchResponse,
};
