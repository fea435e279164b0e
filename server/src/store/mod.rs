pub mod memory;
pub mod postgres;

use thiserror::Error;

use crate::models::Recipe;
use crate::query::RecipeQuery;

pub use memory::InMemoryRecipeStore;
pub use postgres::PgRecipeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
}

/// One page of matching recipes plus the total count over the whole filtered
/// set, independent of the page window.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: i64,
}

/// The record store behind the browsing endpoints. Implementations must
/// apply every predicate conjunctively, order by id descending, and report
/// the full filtered count even when the requested page is past the end.
pub trait RecipeStore: Send + Sync {
    fn search(&self, query: &RecipeQuery) -> Result<RecipePage, StoreError>;
    fn get(&self, id: i32) -> Result<Option<Recipe>, StoreError>;
}
