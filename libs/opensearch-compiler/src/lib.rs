//! OpenSearch query/response compiler
//!
//! Translates between the engine-agnostic [`search_model`] types and the
//! OpenSearch wire format:
//!
//! - [`RequestCompiler`] lowers a [`search_model::SearchRequest`] and a
//!   [`FieldCatalog`] into a [`NativeQuery`] (`_search` request body)
//! - [`ResponseCompiler`] lifts a [`NativeSearchResult`] back into a
//!   [`search_model::SearchResponse`], using the issuing request to
//!   correlate aggregation buckets
//!
//! Both compilers are pure: no I/O, no shared state, safe to call from any
//! number of threads.
//!
//! # Example
//!
//! ```rust
//! use opensearch_compiler::{FieldCatalog, FieldDescriptor, FieldType, RequestCompiler};
//! use search_model::{Filter, SearchRequest};
//!
//! let fields = FieldCatalog::new().with_field("Color", FieldDescriptor::new(FieldType::Boolean));
//! let request = SearchRequest {
//!     search_keywords: Some("red shoes".to_string()),
//!     search_fields: Some(vec!["Name".to_string()]),
//!     filter: Some(Filter::term("Color", ["1"])),
//!     ..Default::default()
//! };
//!
//! let query = RequestCompiler::default().compile(Some(&request), "products", &fields);
//! let body = serde_json::to_value(&query).unwrap();
//! assert_eq!(body["post_filter"]["terms"]["color"][0], "true");
//! ```
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod naming;
pub mod query;
pub mod request;
pub mod response;
pub mod result;

pub use catalog::{FieldCatalog, FieldDescriptor, FieldType};
pub use error::{Error, Result};
pub use naming::composite_key;
pub use query::{Aggregation, AggregationMap, AutoFuzziness, Fuzziness, NativeQuery, Query, Sort};
pub use request::{
    lower_aggregations, lower_filter, CompilerOptions, RequestCompiler, UNBOUNDED_BUCKET_COUNT,
};
pub use response::ResponseCompiler;
pub use result::{Aggregate, Hit, NativeSearchResult};
