pub mod api;
pub mod db;
pub mod models;
pub mod query;
pub mod schema;
pub mod store;

use std::sync::Arc;

/// Application state shared across all handlers. The store is behind a trait
/// object so integration tests can swap in the in-memory implementation.
pub type AppState = Arc<dyn store::RecipeStore>;
