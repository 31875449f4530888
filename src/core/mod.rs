pub mod catalog;
pub mod favorites;
pub mod filter;
pub mod projection;
pub mod store;

pub use catalog::{Catalog, CatalogLoad, CatalogLoader, read_catalog};
pub use favorites::{FavoritesChange, FavoritesChangeKind, FavoritesObserver, FavoritesStore};
pub use filter::{CountFacet, FacetCategory, FilterBadge, FilterState, PriceRange, matches};
pub use projection::{Projection, project, results_text, summary_text};
pub use store::{KeyValueStore, LocalStore, MemoryStore, SqliteStore};
