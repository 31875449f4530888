use crate::{
    core::filter::{FilterState, matches},
    models::{PlanId, PlanRecord},
};

/// Filtered view of the catalog for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    /// Matching plans in catalog order.
    pub results: Vec<&'a PlanRecord>,
    pub count: usize,
    pub total: usize,
}

/// Select the plans of `catalog` that satisfy `state`, keeping catalog order.
///
/// Pure: the same inputs always produce the same projection.
pub fn project<'a>(catalog: &'a [PlanRecord], state: &FilterState) -> Projection<'a> {
    let results: Vec<&PlanRecord> = catalog.iter().filter(|plan| matches(plan, state)).collect();
    Projection {
        count: results.len(),
        total: catalog.len(),
        results,
    }
}

impl<'a> Projection<'a> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> Vec<&'a PlanId> {
        self.results.iter().map(|plan| &plan.id).collect()
    }

    /// Results line above the grid.
    pub fn summary(&self) -> String {
        summary_text(self.count, self.total)
    }

    /// Results line of the search overlay.
    pub fn results_label(&self) -> String {
        results_text(self.count)
    }
}

/// "Showing all N house plans" or "Showing n of N house plans".
pub fn summary_text(count: usize, total: usize) -> String {
    if count == total {
        format!("Showing all {} house plans", total)
    } else {
        format!("Showing {} of {} house plans", count, total)
    }
}

/// "n result" / "n results".
pub fn results_text(count: usize) -> String {
    format!("{} result{}", count, if count == 1 { "" } else { "s" })
}
