use std::borrow::Cow;

use url::form_urlencoded;

use super::{FacetCategory, FilterState};

/// Query-string key of the free-text search.
pub const QUERY_KEY: &str = "q";

impl FilterState {
    /// Parse the query component of a page address, with or without the leading `?`.
    ///
    /// Unknown keys are ignored and malformed values are skipped one by one,
    /// so a bad fragment never discards the rest of the state.
    pub fn from_navigable_state(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('?');
        let fragments: Vec<Cow<'_, str>> = raw.split('&').map(keep_literal_plus).collect();
        Self::from_pairs(form_urlencoded::parse(fragments.join("&").as_bytes()))
    }

    /// Build a state from already-decoded key/value pairs. Repeated keys merge.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = FilterState::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == QUERY_KEY {
                state.set_query(value);
                continue;
            }
            let Some(category) = FacetCategory::from_key(key) else {
                tracing::debug!(key, "ignoring unknown navigable state key");
                continue;
            };
            if category == FacetCategory::Price {
                if let Err(e) = state.select(category, value) {
                    tracing::warn!(error = %e, "skipping price range");
                }
                continue;
            }
            for item in value.split(',').filter(|item| !item.trim().is_empty()) {
                if let Err(e) = state.select(category, item) {
                    tracing::warn!(error = %e, "skipping filter value");
                }
            }
        }
        state
    }

    /// Ordered key/value pairs of the non-empty categories.
    pub fn navigable_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = FacetCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let values = self.values(category);
                (!values.is_empty()).then(|| (category.key(), values.join(",")))
            })
            .collect();
        if let Some(query) = &self.query {
            pairs.push((QUERY_KEY, query.clone()));
        }
        pairs
    }

    /// Encode as a query component (without the leading `?`). Empty state encodes as "".
    pub fn to_navigable_state(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.navigable_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

/// Hand-written links use a bare `+` for "or more" (`bedrooms=4+`). Form
/// decoding would turn it into a space, so escape it first for the count and
/// price keys. Everywhere else `+` keeps meaning a space.
fn keep_literal_plus(fragment: &str) -> Cow<'_, str> {
    match fragment.split_once('=') {
        Some((key, value)) if value.contains('+') => match FacetCategory::from_key(key) {
            Some(
                FacetCategory::Bedrooms
                | FacetCategory::Floors
                | FacetCategory::Bathrooms
                | FacetCategory::Price,
            ) => Cow::Owned(format!("{}={}", key, value.replace('+', "%2B"))),
            _ => Cow::Borrowed(fragment),
        },
        _ => Cow::Borrowed(fragment),
    }
}
