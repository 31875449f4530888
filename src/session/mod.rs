mod debounce;
mod driver;

use std::{collections::HashSet, path::PathBuf, time::Duration};

use crate::{
    core::{
        catalog::{CatalogLoad, CatalogLoader, DEFAULT_CATALOG_PATH},
        favorites::{FAVORITES_KEY, FavoritesStore},
        filter::{FacetCategory, FilterState},
        projection::{Projection, project},
        store::KeyValueStore,
    },
    error::{CatalogError, PayloadError},
    models::{FavoritesEntry, PlanId, PlanRecord},
};

pub use debounce::{DEFAULT_DEBOUNCE_WINDOW, Debouncer};
pub use driver::SessionDriver;

/// Settings for one browsing session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub catalog_path: PathBuf,
    pub favorites_key: String,
    pub debounce_window: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            favorites_key: FAVORITES_KEY.to_string(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

/// A plan as handed to the presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanCard<'a> {
    pub plan: &'a PlanRecord,
    pub favorited: bool,
}

/// What the session draws through. Implementations decide how.
pub trait Presenter {
    fn render(&mut self, cards: &[PlanCard<'_>], state: &FilterState);
    fn render_count(&mut self, count: usize, total: usize);
    fn render_empty_state(&mut self);
    fn render_load_error(&mut self, error: &CatalogError);

    /// Mirror the filter state into the page address.
    fn sync_address(&mut self, _query: &str) {}

    fn favorite_toggled(&mut self, _id: &PlanId, _favorited: bool) {}
}

/// User interactions the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    FacetChanged {
        category: FacetCategory,
        value: String,
        selected: bool,
    },
    QueryChanged(String),
    RemoveBadge {
        category: FacetCategory,
        value: String,
    },
    ClearAll,
    FavoriteToggled(PlanId),
}

/// When a handled signal wants the results redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Now,
    Debounced,
    Skip,
}

/// Everything one page session owns: catalog, filter state, favorites and presenter.
pub struct Session<S, P> {
    load: CatalogLoad,
    state: FilterState,
    favorites: FavoritesStore<S>,
    presenter: P,
}

impl<S: KeyValueStore, P: Presenter> Session<S, P> {
    /// Assemble a session without drawing anything.
    pub fn new(load: CatalogLoad, state: FilterState, favorites: FavoritesStore<S>, presenter: P) -> Self {
        Self {
            load,
            state,
            favorites,
            presenter,
        }
    }

    /// Page-load initialization: load the catalog, restore the filter state
    /// from the address and draw the first results.
    pub async fn start(
        loader: &CatalogLoader,
        address: &str,
        favorites: FavoritesStore<S>,
        presenter: P,
    ) -> Self {
        let load = loader.load().await.clone();
        let state = FilterState::from_navigable_state(address);
        let mut session = Self::new(load, state, favorites, presenter);
        session.refresh().await;
        session
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn catalog(&self) -> &[PlanRecord] {
        self.load.catalog.plans()
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    pub fn projection(&self) -> Projection<'_> {
        project(self.load.catalog.plans(), &self.state)
    }

    /// Apply a signal to the session state and report how to redraw.
    ///
    /// Checkbox and search-box changes are debounced; badge removal and
    /// clearing redraw at once. Favorite toggles only restyle one card.
    pub async fn handle(&mut self, signal: Signal) -> Refresh {
        match signal {
            Signal::FacetChanged {
                category,
                value,
                selected,
            } => {
                if let Err(e) = self.state.toggle_facet(category, &value, selected) {
                    tracing::warn!(error = %e, "ignoring facet change");
                    return Refresh::Skip;
                }
                Refresh::Debounced
            }
            Signal::QueryChanged(text) => {
                self.state.set_query(&text);
                Refresh::Debounced
            }
            Signal::RemoveBadge { category, value } => {
                self.state = self.state.remove_facet(category, &value);
                Refresh::Now
            }
            Signal::ClearAll => {
                self.state.clear_facets();
                Refresh::Now
            }
            Signal::FavoriteToggled(id) => {
                let Some(plan) = self.load.catalog.get(&id) else {
                    tracing::warn!(%id, "favorite toggled for unknown plan");
                    return Refresh::Skip;
                };
                let favorited = self.favorites.toggle(FavoritesEntry::from(plan)).await;
                self.presenter.favorite_toggled(&id, favorited);
                Refresh::Skip
            }
        }
    }

    /// Toggle a favorite from the record embedded in a button. A malformed
    /// payload is logged and skipped.
    pub async fn toggle_favorite_payload(&mut self, payload: &str) -> Result<bool, PayloadError> {
        let entry = FavoritesEntry::from_payload(payload).inspect_err(|e| {
            tracing::warn!(error = %e, "skipping favorite button");
        })?;
        let id = entry.id.clone();
        let favorited = self.favorites.toggle(entry).await;
        self.presenter.favorite_toggled(&id, favorited);
        Ok(favorited)
    }

    /// Recompute the projection and push it to the presenter.
    pub async fn refresh(&mut self) {
        if let Some(error) = self.load.error.clone() {
            self.presenter.render_load_error(&error);
            return;
        }

        let favorite_ids: HashSet<PlanId> = self
            .favorites
            .list()
            .await
            .into_iter()
            .map(|entry| entry.id)
            .collect();

        let projection = project(self.load.catalog.plans(), &self.state);
        tracing::debug!(count = projection.count, total = projection.total, "projection recomputed");

        self.presenter.sync_address(&self.state.to_navigable_state());
        self.presenter.render_count(projection.count, projection.total);
        if projection.is_empty() {
            self.presenter.render_empty_state();
            return;
        }
        let cards: Vec<PlanCard<'_>> = projection
            .results
            .iter()
            .copied()
            .map(|plan| PlanCard {
                plan,
                favorited: favorite_ids.contains(&plan.id),
            })
            .collect();
        self.presenter.render(&cards, &self.state);
    }
}
