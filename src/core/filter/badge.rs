use super::{CountFacet, FacetCategory, FilterState};

/// One removable chip in the active-filters bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBadge {
    pub category: FacetCategory,
    /// Value to hand back to [`FilterState::remove_facet`].
    pub value: String,
    pub label: String,
}

fn count_label(facet: CountFacet, noun: &str) -> String {
    match facet {
        CountFacet::Exactly(1) => format!("1 {}", noun),
        other => format!("{} {}s", other, noun),
    }
}

impl FilterState {
    /// Badges for every active selection, in category order. The search text has no badge.
    pub fn badges(&self) -> Vec<FilterBadge> {
        let mut badges = Vec::new();
        let mut push = |category: FacetCategory, value: String, label: String| {
            badges.push(FilterBadge { category, value, label });
        };

        for kind in &self.types {
            push(FacetCategory::Type, kind.clone(), kind.clone());
        }
        for (category, set, noun) in [
            (FacetCategory::Bedrooms, &self.bedrooms, "Bedroom"),
            (FacetCategory::Floors, &self.floors, "Floor"),
            (FacetCategory::Bathrooms, &self.bathrooms, "Bathroom"),
        ] {
            for facet in set {
                push(category, facet.to_string(), count_label(*facet, noun));
            }
        }
        for style in &self.styles {
            push(FacetCategory::Style, style.clone(), style.clone());
        }
        for band in &self.size_bands {
            push(FacetCategory::Size, band.clone(), band.clone());
        }
        if let Some(range) = &self.price_range {
            push(FacetCategory::Price, range.to_string(), range.to_string());
        }
        badges
    }
}
