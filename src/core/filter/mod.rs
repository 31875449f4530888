mod badge;
mod navigable;
mod predicate;

use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::error::ParseError;

pub use badge::FilterBadge;
pub use predicate::matches;

/// The filterable attributes of a plan, in the order badges are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetCategory {
    Type,
    Bedrooms,
    Floors,
    Bathrooms,
    Style,
    Size,
    Price,
}

impl FacetCategory {
    pub const ALL: [FacetCategory; 7] = [
        FacetCategory::Type,
        FacetCategory::Bedrooms,
        FacetCategory::Floors,
        FacetCategory::Bathrooms,
        FacetCategory::Style,
        FacetCategory::Size,
        FacetCategory::Price,
    ];

    /// Query-string key, also used as the badge category.
    pub fn key(self) -> &'static str {
        match self {
            FacetCategory::Type => "type",
            FacetCategory::Bedrooms => "bedrooms",
            FacetCategory::Floors => "floors",
            FacetCategory::Bathrooms => "bathrooms",
            FacetCategory::Style => "style",
            FacetCategory::Size => "size",
            FacetCategory::Price => "price",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FacetCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

/// A selected value of a count facet (bedrooms, bathrooms, floors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountFacet {
    Exactly(u32),
    /// The `N+` band: any count of at least N.
    AtLeast(u32),
}

impl CountFacet {
    pub fn accepts(self, value: u32) -> bool {
        match self {
            CountFacet::Exactly(n) => value == n,
            CountFacet::AtLeast(n) => value >= n,
        }
    }

    fn parse(category: FacetCategory, raw: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidFacetValue {
            category: category.key(),
            value: raw.to_string(),
        };
        let value = raw.trim();
        match value.strip_suffix('+') {
            Some(n) => n.trim().parse().map(CountFacet::AtLeast).map_err(|_| invalid()),
            None => value.parse().map(CountFacet::Exactly).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for CountFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountFacet::Exactly(n) => write!(f, "{}", n),
            CountFacet::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

/// Inclusive price bucket. `max == None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = ParseError;

    /// Accepts `min-max`, `min-`, `min+` and `min`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPriceRange(s.to_string());
        let parse_bound = |raw: &str| -> Result<f64, ParseError> {
            let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(invalid())
            }
        };

        let s = s.trim();
        let (min, max) = match s.split_once('-') {
            Some((min, max)) if max.trim().is_empty() => (parse_bound(min)?, None),
            Some((min, max)) => (parse_bound(min)?, Some(parse_bound(max)?)),
            None => (parse_bound(s.trim_end_matches('+'))?, None),
        };
        if max.is_some_and(|max| max < min) {
            return Err(invalid());
        }
        Ok(PriceRange { min, max })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}", self.min),
        }
    }
}

/// Current filter selections: sidebar facets, price bucket and search text.
///
/// Empty sets impose no constraint, so `FilterState::default()` matches every plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub types: BTreeSet<String>,
    pub bedrooms: BTreeSet<CountFacet>,
    pub floors: BTreeSet<CountFacet>,
    pub bathrooms: BTreeSet<CountFacet>,
    pub styles: BTreeSet<String>,
    pub size_bands: BTreeSet<String>,
    pub price_range: Option<PriceRange>,
    pub query: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.bedrooms.is_empty()
            && self.floors.is_empty()
            && self.bathrooms.is_empty()
            && self.styles.is_empty()
            && self.size_bands.is_empty()
            && self.price_range.is_none()
            && self.query.is_none()
    }

    /// Add a value to a category. For price this replaces the current bucket.
    pub fn select(&mut self, category: FacetCategory, value: &str) -> Result<(), ParseError> {
        if category == FacetCategory::Price {
            self.price_range = Some(value.parse()?);
            return Ok(());
        }
        if let Some(set) = self.count_set_mut(category) {
            set.insert(CountFacet::parse(category, value)?);
            return Ok(());
        }
        let value = value.trim();
        // Commas separate values in the navigable state.
        if value.is_empty() || value.contains(',') {
            return Err(ParseError::InvalidFacetValue {
                category: category.key(),
                value: value.to_string(),
            });
        }
        if let Some(set) = self.text_set_mut(category) {
            // Matching ignores case, so one spelling per value is enough.
            if !set.iter().any(|s| s.eq_ignore_ascii_case(value)) {
                set.insert(value.to_string());
            }
        }
        Ok(())
    }

    /// Remove a value in place. Returns whether anything changed.
    pub fn deselect(&mut self, category: FacetCategory, value: &str) -> bool {
        if category == FacetCategory::Price {
            return self.price_range.take().is_some();
        }
        if let Some(set) = self.count_set_mut(category) {
            return CountFacet::parse(category, value)
                .map(|facet| set.remove(&facet))
                .unwrap_or(false);
        }
        match self.text_set_mut(category) {
            Some(set) => {
                let value = value.trim();
                let before = set.len();
                set.retain(|s| !s.eq_ignore_ascii_case(value));
                set.len() != before
            }
            None => false,
        }
    }

    /// Checkbox change: select or deselect depending on the control state.
    pub fn toggle_facet(
        &mut self,
        category: FacetCategory,
        value: &str,
        selected: bool,
    ) -> Result<(), ParseError> {
        if selected {
            self.select(category, value)
        } else {
            self.deselect(category, value);
            Ok(())
        }
    }

    /// Copy of this state with exactly one value removed. The receiver is untouched.
    pub fn remove_facet(&self, category: FacetCategory, value: &str) -> FilterState {
        let mut next = self.clone();
        next.deselect(category, value);
        next
    }

    /// Set the free-text query. Blank text clears it.
    pub fn set_query(&mut self, text: &str) {
        let text = text.trim();
        self.query = (!text.is_empty()).then(|| text.to_string());
    }

    /// Lowercased query used for substring matching.
    pub fn search_needle(&self) -> Option<String> {
        self.query.as_deref().map(str::to_lowercase)
    }

    /// Drop every sidebar selection, keeping the search text.
    pub fn clear_facets(&mut self) {
        let query = self.query.take();
        *self = FilterState { query, ..FilterState::default() };
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    fn count_set_mut(&mut self, category: FacetCategory) -> Option<&mut BTreeSet<CountFacet>> {
        match category {
            FacetCategory::Bedrooms => Some(&mut self.bedrooms),
            FacetCategory::Floors => Some(&mut self.floors),
            FacetCategory::Bathrooms => Some(&mut self.bathrooms),
            _ => None,
        }
    }

    fn text_set_mut(&mut self, category: FacetCategory) -> Option<&mut BTreeSet<String>> {
        match category {
            FacetCategory::Type => Some(&mut self.types),
            FacetCategory::Style => Some(&mut self.styles),
            FacetCategory::Size => Some(&mut self.size_bands),
            _ => None,
        }
    }

    /// Selected values of a category, formatted the way the navigable state writes them.
    pub fn values(&self, category: FacetCategory) -> Vec<String> {
        fn strings<T: ToString>(set: &BTreeSet<T>) -> Vec<String> {
            set.iter().map(ToString::to_string).collect()
        }
        match category {
            FacetCategory::Type => strings(&self.types),
            FacetCategory::Bedrooms => strings(&self.bedrooms),
            FacetCategory::Floors => strings(&self.floors),
            FacetCategory::Bathrooms => strings(&self.bathrooms),
            FacetCategory::Style => strings(&self.styles),
            FacetCategory::Size => strings(&self.size_bands),
            FacetCategory::Price => self.price_range.iter().map(ToString::to_string).collect(),
        }
    }
}
