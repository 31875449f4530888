use std::collections::BTreeSet;

use super::{CountFacet, FilterState};
use crate::models::PlanRecord;

/// Whether `plan` passes every active constraint of `state`.
///
/// Categories combine with AND, values inside a category with OR. An empty
/// category never excludes anything.
pub fn matches(plan: &PlanRecord, state: &FilterState) -> bool {
    text_facet(&state.types, &plan.kind)
        && text_facet(&state.styles, &plan.style)
        && text_facet(&state.size_bands, &plan.size_band)
        && count_facet(&state.bedrooms, plan.bedrooms)
        && count_facet(&state.bathrooms, plan.bathrooms)
        && count_facet(&state.floors, plan.floors)
        && state
            .price_range
            .is_none_or(|range| range.contains(plan.price_from))
        && state
            .search_needle()
            .is_none_or(|needle| plan.search_text().contains(&needle))
}

fn text_facet(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| s.eq_ignore_ascii_case(value))
}

fn count_facet(selected: &BTreeSet<CountFacet>, value: u32) -> bool {
    selected.is_empty() || selected.iter().any(|facet| facet.accepts(value))
}

impl FilterState {
    pub fn matches(&self, plan: &PlanRecord) -> bool {
        matches(plan, self)
    }
}
