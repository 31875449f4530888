use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::{
    error::CatalogError,
    models::{PlanId, PlanRecord},
};

pub const DEFAULT_CATALOG_PATH: &str = "data/projects.json";

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    projects: Option<Vec<serde_json::Value>>,
}

/// Immutable list of plans for the session. Cloning shares the same records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plans: Arc<[PlanRecord]>,
}

impl Catalog {
    pub fn new(plans: Vec<PlanRecord>) -> Self {
        Self { plans: plans.into() }
    }

    /// Parse a `{ "projects": [...] }` document.
    ///
    /// Records that fail to parse, and repeats of an id already seen, are
    /// skipped; the rest of the catalog is kept.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        let mut seen: HashSet<PlanId> = HashSet::new();
        let mut plans = Vec::new();
        for (index, value) in document.projects.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_value::<PlanRecord>(value) {
                Ok(plan) if seen.insert(plan.id.clone()) => plans.push(plan),
                Ok(plan) => tracing::warn!(id = %plan.id, "skipping duplicate plan id"),
                Err(e) => tracing::warn!(index, error = %e, "skipping malformed plan record"),
            }
        }
        Ok(Self::new(plans))
    }

    pub fn plans(&self) -> &[PlanRecord] {
        &self.plans
    }

    pub fn get(&self, id: &PlanId) -> Option<&PlanRecord> {
        self.plans.iter().find(|plan| &plan.id == id)
    }

    /// Find a plan by id as typed by a user. `12` finds both the numeric
    /// id 12 and the string id `"12"`.
    pub fn lookup(&self, raw: &str) -> Option<&PlanRecord> {
        let Ok(id) = raw.parse::<PlanId>();
        self.get(&id).or_else(|| {
            let raw = raw.trim();
            self.plans.iter().find(|plan| plan.id.to_string() == raw)
        })
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Read and parse the catalog document at `path`.
pub async fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Catalog::from_json(&raw)
}

/// Outcome of the one catalog load of a session. A failed load still
/// carries an (empty) catalog so filtering keeps working.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub error: Option<Arc<CatalogError>>,
}

impl CatalogLoad {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Loads the catalog at most once. Callers arriving while the read is in
/// flight wait for it instead of starting another.
#[derive(Debug)]
pub struct CatalogLoader {
    path: PathBuf,
    loaded: OnceCell<CatalogLoad>,
}

impl CatalogLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            loaded: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> &CatalogLoad {
        self.loaded
            .get_or_init(|| async {
                match read_catalog(&self.path).await {
                    Ok(catalog) => {
                        tracing::info!(plans = catalog.len(), path = ?self.path, "catalog loaded");
                        CatalogLoad {
                            catalog,
                            error: None,
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load catalog");
                        CatalogLoad {
                            catalog: Catalog::default(),
                            error: Some(Arc::new(e)),
                        }
                    }
                }
            })
            .await
    }
}
