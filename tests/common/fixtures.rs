use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use houseplans::core::{
    Catalog, CatalogLoad, FavoritesChange, FavoritesObserver, FavoritesStore, FilterState,
    KeyValueStore, MemoryStore,
};
use houseplans::error::CatalogError;
use houseplans::models::{FavoritesEntry, PlanId, PlanRecord};
use houseplans::session::{PlanCard, Presenter, Session};

/// Builds a plan with the fields the filter looks at; everything else is filler.
pub fn make_plan(id: u64, bedrooms: u32, style: &str, price_from: f64) -> PlanRecord {
    PlanRecord {
        id: PlanId::Number(id),
        title: format!("Plan {}", id),
        subtitle: None,
        kind: "House".to_string(),
        style: style.to_string(),
        bedrooms,
        bathrooms: 2,
        floors: 1,
        size_sqm: 120.0,
        size_band: "100-150".to_string(),
        price_from,
        images: vec![format!("images/plan-{}.jpg", id)],
        badge: None,
    }
}

/// The three-plan catalog used throughout the filter tests.
pub fn sample_plans() -> Vec<PlanRecord> {
    vec![
        make_plan(1, 3, "Modern", 150000.0),
        make_plan(2, 4, "Modern", 220000.0),
        make_plan(3, 3, "Farmhouse", 180000.0),
    ]
}

pub fn sample_catalog() -> Catalog {
    Catalog::new(sample_plans())
}

pub fn make_entry(id: u64) -> FavoritesEntry {
    FavoritesEntry::from(&make_plan(id, 3, "Modern", 150000.0))
}

pub fn ids(plans: &[&PlanRecord]) -> Vec<u64> {
    plans
        .iter()
        .map(|plan| match plan.id {
            PlanId::Number(n) => n,
            PlanId::Text(_) => panic!("fixture plans use numeric ids"),
        })
        .collect()
}

/// Writes a catalog document into a fresh temp dir.
/// Returns the file path and the directory (which must be kept alive).
pub fn write_catalog_file(contents: &str) -> (PathBuf, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("projects.json");
    std::fs::write(&path, contents).expect("Failed to write catalog");
    (path, dir)
}

pub fn sample_catalog_json() -> String {
    serde_json::json!({ "projects": sample_plans() }).to_string()
}

/// Everything a presenter was asked to draw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Results(Vec<PlanId>),
    Count(usize, usize),
    Empty,
    LoadError,
    Address(String),
    Favorite(PlanId, bool),
}

/// Presenter that records calls. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<Rendered>>>,
    favorited: Arc<Mutex<Vec<PlanId>>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    /// Number of full redraws (result grids or empty states).
    pub fn redraws(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Rendered::Results(_) | Rendered::Empty))
            .count()
    }

    pub fn last_results(&self) -> Option<Vec<PlanId>> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::Results(ids) => Some(ids),
            _ => None,
        })
    }

    pub fn last_address(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Rendered::Address(query) => Some(query),
            _ => None,
        })
    }

    /// Ids drawn with the favorited marker in the last grid.
    pub fn last_favorited(&self) -> Vec<PlanId> {
        self.favorited.lock().unwrap().clone()
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, cards: &[PlanCard<'_>], _state: &FilterState) {
        *self.favorited.lock().unwrap() = cards
            .iter()
            .filter(|card| card.favorited)
            .map(|card| card.plan.id.clone())
            .collect();
        self.push(Rendered::Results(
            cards.iter().map(|card| card.plan.id.clone()).collect(),
        ));
    }

    fn render_count(&mut self, count: usize, total: usize) {
        self.push(Rendered::Count(count, total));
    }

    fn render_empty_state(&mut self) {
        self.push(Rendered::Empty);
    }

    fn render_load_error(&mut self, _error: &CatalogError) {
        self.push(Rendered::LoadError);
    }

    fn sync_address(&mut self, query: &str) {
        self.push(Rendered::Address(query.to_string()));
    }

    fn favorite_toggled(&mut self, id: &PlanId, favorited: bool) {
        self.push(Rendered::Favorite(id.clone(), favorited));
    }
}

/// Observer that records favorites notifications.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub changes: Mutex<Vec<FavoritesChange>>,
    pub failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn changes(&self) -> Vec<FavoritesChange> {
        self.changes.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl FavoritesObserver for RecordingObserver {
    fn favorites_changed(&self, change: &FavoritesChange) {
        self.changes.lock().unwrap().push(change.clone());
    }

    fn storage_failed(&self, error: &anyhow::Error) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

/// Store that is reachable for reads but rejects every write, like a full quota.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }

    async fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }
}

/// Store that is disabled entirely.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    async fn get_item(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("storage disabled")
    }

    async fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage disabled")
    }

    async fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage disabled")
    }
}

/// Favorites store over memory with a recording observer attached.
pub fn make_favorites() -> (FavoritesStore<MemoryStore>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let mut favorites = FavoritesStore::new(MemoryStore::new());
    favorites.set_observer(observer.clone());
    (favorites, observer)
}

/// Session over the sample catalog with an empty filter state. Nothing is drawn yet.
pub fn make_session(
    state: FilterState,
) -> (Session<MemoryStore, RecordingPresenter>, RecordingPresenter) {
    let presenter = RecordingPresenter::default();
    let load = CatalogLoad {
        catalog: sample_catalog(),
        error: None,
    };
    let session = Session::new(
        load,
        state,
        FavoritesStore::new(MemoryStore::new()),
        presenter.clone(),
    );
    (session, presenter)
}
