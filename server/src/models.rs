use diesel::prelude::Insertable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// A recipe as served by the API. Rows are created only by the import binary;
/// the browsing endpoints never mutate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub cuisine: String,
    /// Star rating, 0.0-5.0. Null when the source data had none.
    pub rating: Option<f64>,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub total_time: Option<f64>,
    pub description: String,
    /// Open-keyed nutrient map ("calories", "proteinContent", ...). Values are
    /// display text as scraped, e.g. "389 kcal".
    #[serde(default)]
    pub nutrients: HashMap<String, String>,
    /// Display text with a trailing unit, e.g. "4 servings". Not a pure
    /// number, which is why the serves filter is a prefix match.
    pub serves: String,
    pub continent: Option<String>,
    pub country_state: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub url_link: Option<String>,
}

/// Insertable row used by the import binary.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe {
    pub title: String,
    pub cuisine: String,
    pub rating: Option<f64>,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub total_time: Option<f64>,
    pub description: String,
    pub nutrients: serde_json::Value,
    pub serves: String,
    pub continent: Option<String>,
    pub country_state: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub url_link: Option<String>,
}
