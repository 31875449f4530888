mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from houseplans for tests
pub use houseplans::core::{
    Catalog, CatalogLoad, CatalogLoader, CountFacet, FacetCategory, FavoritesChange,
    FavoritesChangeKind, FavoritesObserver, FavoritesStore, FilterBadge, FilterState,
    KeyValueStore, LocalStore, MemoryStore, PriceRange, Projection, SqliteStore, matches, project,
};
pub use houseplans::models::{FavoritesEntry, PlanId, PlanRecord};
pub use houseplans::session::{Debouncer, Presenter, Refresh, Session, SessionDriver, Signal};
