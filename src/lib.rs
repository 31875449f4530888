pub mod core;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;

pub use crate::core::{
    Catalog, CatalogLoader, FacetCategory, FavoritesStore, FilterState, KeyValueStore, MemoryStore,
    Projection, SqliteStore, matches, project,
};
pub use error::{CatalogError, ParseError, PayloadError};
pub use models::{FavoritesEntry, PlanId, PlanRecord};
pub use session::{Presenter, Session, SessionConfig, SessionDriver, Signal};
