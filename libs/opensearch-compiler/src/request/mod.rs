//! Request compiler
//!
//! Lowers a [`SearchRequest`] into a [`NativeQuery`]:
//! - keywords into a `multi_match` query (all terms required)
//! - the filter tree into `post_filter`
//! - aggregations into `aggs`, honouring raw keyword siblings
//! - sorting, paging and source filtering

use search_model::SearchRequest;

use crate::catalog::FieldCatalog;
use crate::naming::to_field_name;
use crate::query::{
    AutoFuzziness, Fuzziness, MultiMatchQuery, NativeQuery, Operator, Query, SourceFilter,
};

mod aggregation;
mod filter;
mod sort;

pub use aggregation::{lower_aggregations, UNBOUNDED_BUCKET_COUNT};
pub use filter::{lower_filter, lower_optional_filter};
pub use sort::SCORE_FIELD;

/// Pseudo-field that matches keywords against every field.
pub const ALL_FIELDS: &str = "_all";

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOptions {
    /// Analyzer applied to the keywords. `None` uses the field's own.
    pub analyzer: Option<String>,
    /// Search field used when the request names none.
    pub default_search_field: String,
    /// Thresholds for automatic fuzziness.
    pub auto_fuzziness: AutoFuzziness,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            analyzer: Some("standard".to_string()),
            default_search_field: ALL_FIELDS.to_string(),
            auto_fuzziness: AutoFuzziness::default(),
        }
    }
}

/// Stateless compiler from [`SearchRequest`] to [`NativeQuery`].
#[derive(Debug, Clone, Default)]
pub struct RequestCompiler {
    options: CompilerOptions,
}

impl RequestCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `request` against `index`.
    ///
    /// Never fails. An absent request yields a query without text query,
    /// filter or aggregations and with engine-default paging.
    pub fn compile(
        &self,
        request: Option<&SearchRequest>,
        index: &str,
        fields: &FieldCatalog,
    ) -> NativeQuery {
        let mut result = NativeQuery::new(index);

        let Some(request) = request else {
            tracing::debug!(index, "compiled empty search request");
            return result;
        };

        result.query = self.keyword_query(request);
        result.post_filter = lower_optional_filter(request.filter.as_ref(), fields);
        result.aggregations = lower_aggregations(request, fields);
        result.sort = sort::lower_sorting(&request.sorting);
        result.from = Some(request.skip);
        result.size = Some(request.take);
        result.track_scores = Some(request.sorting.iter().any(sort::is_score_field));

        if let Some(include_fields) = request
            .include_fields
            .as_ref()
            .filter(|fields| !fields.is_empty())
        {
            result.source = Some(SourceFilter {
                includes: include_fields.clone(),
            });
        }

        // Exact totals are cheap for single-document lookups.
        if request.take == 1 {
            result.track_total_hits = Some(true);
        }

        tracing::debug!(
            index,
            has_query = result.query.is_some(),
            has_filter = result.post_filter.is_some(),
            aggregations = result.aggregations.as_ref().map_or(0, |a| a.len()),
            sort_clauses = request.sorting.len(),
            "compiled search request"
        );

        result
    }

    fn keyword_query(&self, request: &SearchRequest) -> Option<Query> {
        let keywords = request.search_keywords.as_deref().filter(|k| !k.is_empty())?;

        let fields = match request.search_fields.as_deref() {
            Some(fields) if !fields.is_empty() => {
                fields.iter().map(|f| to_field_name(f)).collect()
            }
            _ => vec![self.options.default_search_field.clone()],
        };

        let fuzziness = request.is_fuzzy_search.then(|| match request.fuzziness {
            Some(distance) => Fuzziness::EditDistance(distance),
            None => Fuzziness::Auto(self.options.auto_fuzziness),
        });

        Some(Query::MultiMatch(MultiMatchQuery {
            query: keywords.to_string(),
            fields,
            analyzer: self.options.analyzer.clone(),
            operator: Operator::And,
            fuzziness,
        }))
    }
}
