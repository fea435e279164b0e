use diesel::pg::Pg;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::models::Recipe;
use crate::query::{CmpOp, NumericField, Predicate, RecipeQuery, TextField};
use crate::schema::recipes;

use super::{RecipePage, RecipeStore, StoreError};

pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = recipes)]
struct RecipeRow {
    id: i32,
    title: String,
    cuisine: String,
    rating: Option<f64>,
    prep_time: Option<f64>,
    cook_time: Option<f64>,
    total_time: Option<f64>,
    description: String,
    nutrients: serde_json::Value,
    serves: String,
    continent: Option<String>,
    country_state: Option<String>,
    ingredients: Vec<Option<String>>,
    instructions: Vec<Option<String>>,
    url_link: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            title: row.title,
            cuisine: row.cuisine,
            rating: row.rating,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            total_time: row.total_time,
            description: row.description,
            nutrients: serde_json::from_value(row.nutrients).unwrap_or_default(),
            serves: row.serves,
            continent: row.continent,
            country_state: row.country_state,
            ingredients: row.ingredients.into_iter().flatten().collect(),
            instructions: row.instructions.into_iter().flatten().collect(),
            url_link: row.url_link,
        }
    }
}

fn like_pattern(value: &str) -> String {
    value.replace('%', "\\%").replace('_', "\\_")
}

fn apply_predicates<'a>(
    mut query: recipes::BoxedQuery<'a, Pg>,
    predicates: &[Predicate],
) -> recipes::BoxedQuery<'a, Pg> {
    for predicate in predicates {
        query = match predicate {
            Predicate::Contains(TextField::Title, value) => {
                query.filter(recipes::title.ilike(format!("%{}%", like_pattern(value))))
            }
            Predicate::Contains(TextField::Cuisine, value) => {
                query.filter(recipes::cuisine.ilike(format!("%{}%", like_pattern(value))))
            }
            // The serves column is "4 servings", so the filter anchors at the
            // start of the string instead of parsing out a number.
            Predicate::ServesPrefix(value) => {
                query.filter(recipes::serves.ilike(format!("{}%", like_pattern(value))))
            }
            Predicate::Compare(field, op, value) => match (field, op) {
                (NumericField::Rating, CmpOp::Eq) => query.filter(recipes::rating.eq(*value)),
                (NumericField::Rating, CmpOp::Gt) => query.filter(recipes::rating.gt(*value)),
                (NumericField::Rating, CmpOp::Ge) => query.filter(recipes::rating.ge(*value)),
                (NumericField::Rating, CmpOp::Lt) => query.filter(recipes::rating.lt(*value)),
                (NumericField::Rating, CmpOp::Le) => query.filter(recipes::rating.le(*value)),
                (NumericField::TotalTime, CmpOp::Eq) => {
                    query.filter(recipes::total_time.eq(*value))
                }
                (NumericField::TotalTime, CmpOp::Gt) => {
                    query.filter(recipes::total_time.gt(*value))
                }
                (NumericField::TotalTime, CmpOp::Ge) => {
                    query.filter(recipes::total_time.ge(*value))
                }
                (NumericField::TotalTime, CmpOp::Lt) => {
                    query.filter(recipes::total_time.lt(*value))
                }
                (NumericField::TotalTime, CmpOp::Le) => {
                    query.filter(recipes::total_time.le(*value))
                }
            },
        };
    }
    query
}

impl RecipeStore for PgRecipeStore {
    fn search(&self, query: &RecipeQuery) -> Result<RecipePage, StoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Counted separately from the page fetch so a page past the end still
        // reports the correct total instead of 0.
        let total: i64 = apply_predicates(recipes::table.into_boxed(), &query.predicates)
            .count()
            .get_result(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // id descending is a deliberate deterministic tiebreaker: pagination
        // stays stable across requests with no explicit sort field.
        let rows: Vec<RecipeRow> =
            apply_predicates(recipes::table.into_boxed(), &query.predicates)
                .select(RecipeRow::as_select())
                .order(recipes::id.desc())
                .limit(query.limit)
                .offset(query.offset())
                .load(&mut conn)
                .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(RecipePage {
            recipes: rows.into_iter().map(Recipe::from).collect(),
            total,
        })
    }

    fn get(&self, id: i32) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.map(Recipe::from))
    }
}
