use search_model::SortingField;

use crate::catalog::FieldType;
use crate::naming::to_field_name;
use crate::query::{FieldSort, GeoDistanceSort, Sort, SortOrder};

/// Reserved sort field name that orders by relevance.
pub const SCORE_FIELD: &str = "score";

pub(super) fn is_score_field(field: &SortingField) -> bool {
    field.field_name.eq_ignore_ascii_case(SCORE_FIELD)
}

pub(super) fn lower_sorting(fields: &[SortingField]) -> Option<Vec<Sort>> {
    if fields.is_empty() {
        return None;
    }
    Some(fields.iter().map(lower_sorting_field).collect())
}

fn lower_sorting_field(field: &SortingField) -> Sort {
    let order = SortOrder::from_descending(field.is_descending);

    if let Some(location) = field.location {
        return Sort::GeoDistance(GeoDistanceSort {
            field: to_field_name(&field.field_name),
            points: vec![location],
            order,
        });
    }

    if is_score_field(field) {
        return Sort::Score(order);
    }

    // Sorting on a field missing from the mapping must not fail the search.
    Sort::Field(FieldSort {
        field: to_field_name(&field.field_name),
        order,
        missing: Some("_last".to_string()),
        unmapped_type: Some(FieldType::Long),
    })
}
