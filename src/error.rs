use std::path::PathBuf;

/// Failures reading the static plan catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single filter fragment that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown filter category: {0}")]
    UnknownCategory(String),

    #[error("Invalid value {value:?} for filter category {category}")]
    InvalidFacetValue { category: &'static str, value: String },

    #[error("Invalid price range: {0:?}")]
    InvalidPriceRange(String),
}

/// A favorite button carried a record that is not valid JSON for an entry.
#[derive(Debug, thiserror::Error)]
#[error("Malformed favorite payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);
