use search_model::{
    AndFilter, Filter, GeoDistanceFilter, IdsFilter, NotFilter, OrFilter, RangeFilter,
    RangeFilterValue, TermFilter, WildCardTermFilter,
};

use crate::catalog::FieldCatalog;
use crate::naming::{normalize_boolean_term, to_field_name};
use crate::query::{
    GeoDistanceQuery, IdsQuery, Query, RangeBounds, RangeQuery, TermsQuery, WildcardQuery,
};

/// Lower a filter tree into a query clause.
///
/// `None` means "no constraint": combinators skip such children and a `Not`
/// over nothing stays nothing.
pub fn lower_filter(filter: &Filter, fields: &FieldCatalog) -> Option<Query> {
    match filter {
        Filter::Ids(f) => Some(ids_query(f)),
        Filter::Term(f) => Some(terms_query(f, fields)),
        Filter::Range(f) => range_filter_query(f),
        Filter::GeoDistance(f) => Some(geo_distance_query(f)),
        Filter::WildCardTerm(f) => Some(wildcard_query(f)),
        Filter::Not(f) => not_query(f, fields),
        Filter::And(f) => Some(and_query(f, fields)),
        Filter::Or(f) => Some(or_query(f, fields)),
    }
}

/// Lower an optional filter, the form requests and aggregations carry.
pub fn lower_optional_filter(filter: Option<&Filter>, fields: &FieldCatalog) -> Option<Query> {
    filter.and_then(|f| lower_filter(f, fields))
}

fn ids_query(filter: &IdsFilter) -> Query {
    Query::Ids(IdsQuery {
        values: filter.values.clone(),
    })
}

fn terms_query(filter: &TermFilter, fields: &FieldCatalog) -> Query {
    let values = if fields.is_boolean(&filter.field_name) {
        filter
            .values
            .iter()
            .map(|v| normalize_boolean_term(v))
            .collect()
    } else {
        filter.values.clone()
    };

    Query::Terms(TermsQuery {
        field: to_field_name(&filter.field_name),
        values,
    })
}

fn range_filter_query(filter: &RangeFilter) -> Option<Query> {
    let field = to_field_name(&filter.field_name);
    filter
        .values
        .iter()
        .map(|value| range_query(&field, value))
        .reduce(Query::or)
}

fn range_query(field: &str, value: &RangeFilterValue) -> Query {
    Query::Range(RangeQuery {
        field: field.to_string(),
        bounds: RangeBounds::new(
            value.lower_bound(),
            value.upper_bound(),
            value.include_lower,
            value.include_upper,
        ),
    })
}

fn geo_distance_query(filter: &GeoDistanceFilter) -> Query {
    Query::GeoDistance(GeoDistanceQuery {
        field: to_field_name(&filter.field_name),
        location: filter.location,
        distance_km: filter.distance,
    })
}

fn wildcard_query(filter: &WildCardTermFilter) -> Query {
    Query::Wildcard(WildcardQuery {
        field: to_field_name(&filter.field_name),
        value: filter.value.clone(),
    })
}

fn not_query(filter: &NotFilter, fields: &FieldCatalog) -> Option<Query> {
    let Some(child) = filter.child_filter.as_deref() else {
        tracing::trace!("not filter without child lowers to no constraint");
        return None;
    };

    match lower_filter(child, fields) {
        Some(query) => Some(query.negate()),
        None => {
            tracing::trace!("not filter over an unconstrained child lowers to no constraint");
            None
        }
    }
}

fn and_query(filter: &AndFilter, fields: &FieldCatalog) -> Query {
    filter
        .child_filters
        .iter()
        .filter_map(|child| lower_filter(child, fields))
        .fold(Query::match_all(), Query::and)
}

fn or_query(filter: &OrFilter, fields: &FieldCatalog) -> Query {
    filter
        .child_filters
        .iter()
        .filter_map(|child| lower_filter(child, fields))
        .fold(Query::match_none(), Query::or)
}
