use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

/// Identifier of a plan in the catalog.
///
/// Catalog documents use either integers or strings for ids; both are kept
/// as-is so a favorite saved from one page compares equal on every other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanId::Number(n) => write!(f, "{}", n),
            PlanId::Text(s) => f.write_str(s),
        }
    }
}

/// Digits-only input parses as a numeric id, anything else as text.
impl FromStr for PlanId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<u64>()
            .map(PlanId::Number)
            .unwrap_or_else(|_| PlanId::Text(s.to_string())))
    }
}

impl From<u64> for PlanId {
    fn from(value: u64) -> Self {
        PlanId::Number(value)
    }
}

impl From<&str> for PlanId {
    fn from(value: &str) -> Self {
        PlanId::Text(value.to_string())
    }
}

/// One entry of the static plan catalog. Read-only for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    pub id: PlanId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub floors: u32,
    #[serde(default)]
    pub size_sqm: f64,
    #[serde(default)]
    pub size_band: String,
    #[serde(default)]
    pub price_from: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl PlanRecord {
    /// Canonical thumbnail (first image), if the plan has any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Text the search overlay matches against, lowercased.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} bedroom {}",
            self.title,
            self.subtitle.as_deref().unwrap_or(""),
            self.style,
            self.kind,
            self.bedrooms,
            self.id
        )
        .to_lowercase()
    }
}

/// Denormalized snapshot of a plan kept in the favorites slot, so the
/// favorites list can be shown without the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesEntry {
    pub id: PlanId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub size_sqm: f64,
    #[serde(default)]
    pub price_from: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl FavoritesEntry {
    /// Parse the record embedded in a favorite button. Extra plan fields are ignored.
    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl From<&PlanRecord> for FavoritesEntry {
    fn from(plan: &PlanRecord) -> Self {
        Self {
            id: plan.id.clone(),
            title: plan.title.clone(),
            subtitle: plan.subtitle.clone(),
            style: plan.style.clone(),
            bedrooms: plan.bedrooms,
            bathrooms: plan.bathrooms,
            size_sqm: plan.size_sqm,
            price_from: plan.price_from,
            images: plan.images.clone(),
            badge: plan.badge.clone(),
        }
    }
}
