use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::FavoritesEntry;

pub const FAVORITES_SCHEMA_VERSION: u32 = 1;

/// Persisted value of the favorites slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesDocument {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub entries: Vec<FavoritesEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Favorites slot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported favorites schema version {0}")]
    UnsupportedVersion(u64),

    #[error("Favorites slot has an unexpected shape")]
    UnexpectedShape,
}

impl FavoritesDocument {
    pub fn new(entries: Vec<FavoritesEntry>) -> Self {
        Self {
            version: FAVORITES_SCHEMA_VERSION,
            updated_at: OffsetDateTime::now_utc(),
            entries,
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a slot value into entries, upgrading older layouts.
    ///
    /// Version 0 is the unversioned layout: a bare array of entries.
    /// Entries that fail to parse are dropped individually, and only the
    /// first entry per id is kept.
    pub fn decode(raw: &str) -> Result<Vec<FavoritesEntry>, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut object) => {
                let version = object
                    .get("version")
                    .and_then(serde_json::Value::as_u64)
                    .ok_or(DocumentError::UnexpectedShape)?;
                if version != u64::from(FAVORITES_SCHEMA_VERSION) {
                    return Err(DocumentError::UnsupportedVersion(version));
                }
                match object.remove("entries") {
                    Some(serde_json::Value::Array(items)) => items,
                    _ => return Err(DocumentError::UnexpectedShape),
                }
            }
            _ => return Err(DocumentError::UnexpectedShape),
        };

        let mut seen = HashSet::new();
        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<FavoritesEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping unreadable favorite");
                    None
                }
            })
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect())
    }
}
