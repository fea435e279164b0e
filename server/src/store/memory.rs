//! In-memory record store with the same matching semantics as Postgres.
//! Backs the unit and integration tests; never used in production.

use crate::models::Recipe;
use crate::query::{CmpOp, NumericField, Predicate, RecipeQuery, TextField};

use super::{RecipePage, RecipeStore, StoreError};

pub struct InMemoryRecipeStore {
    recipes: Vec<Recipe>,
}

impl InMemoryRecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }
}

fn matches(recipe: &Recipe, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Contains(field, value) => {
            let haystack = match field {
                TextField::Title => &recipe.title,
                TextField::Cuisine => &recipe.cuisine,
            };
            haystack.to_lowercase().contains(&value.to_lowercase())
        }
        Predicate::ServesPrefix(value) => recipe
            .serves
            .to_lowercase()
            .starts_with(&value.to_lowercase()),
        Predicate::Compare(field, op, value) => {
            let stored = match field {
                NumericField::Rating => recipe.rating,
                NumericField::TotalTime => recipe.total_time,
            };
            // NULL never matches a comparison, mirroring SQL.
            match stored {
                None => false,
                Some(stored) => match op {
                    CmpOp::Eq => stored == *value,
                    CmpOp::Gt => stored > *value,
                    CmpOp::Ge => stored >= *value,
                    CmpOp::Lt => stored < *value,
                    CmpOp::Le => stored <= *value,
                },
            }
        }
    }
}

impl RecipeStore for InMemoryRecipeStore {
    fn search(&self, query: &RecipeQuery) -> Result<RecipePage, StoreError> {
        let mut matching: Vec<&Recipe> = self
            .recipes
            .iter()
            .filter(|recipe| query.predicates.iter().all(|p| matches(recipe, p)))
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        let total = matching.len() as i64;
        let recipes = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(RecipePage { recipes, total })
    }

    fn get(&self, id: i32) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i32) -> Recipe {
        Recipe {
            id,
            title: format!("Recipe {id}"),
            cuisine: "Unknown".to_string(),
            rating: None,
            prep_time: None,
            cook_time: None,
            total_time: None,
            description: String::new(),
            nutrients: Default::default(),
            serves: String::new(),
            continent: None,
            country_state: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            url_link: None,
        }
    }

    #[test]
    fn test_title_match_is_case_insensitive_substring() {
        let tomato = Recipe {
            title: "Tomato Soup".to_string(),
            ..recipe(1)
        };
        let daily = Recipe {
            title: "soup of the day".to_string(),
            ..recipe(2)
        };
        let snacks = Recipe {
            title: "Super Bowl Snacks".to_string(),
            ..recipe(3)
        };
        let p = Predicate::Contains(TextField::Title, "soup".to_string());
        assert!(matches(&tomato, &p));
        assert!(matches(&daily, &p));
        assert!(!matches(&snacks, &p));
    }

    #[test]
    fn test_serves_prefix_does_not_match_longer_count() {
        let four = Recipe {
            serves: "4 servings".to_string(),
            ..recipe(1)
        };
        let fourteen = Recipe {
            serves: "14 servings".to_string(),
            ..recipe(2)
        };
        let p = Predicate::ServesPrefix("4".to_string());
        assert!(matches(&four, &p));
        assert!(!matches(&fourteen, &p));
    }

    #[test]
    fn test_null_never_matches_numeric_comparison() {
        let unrated = recipe(1);
        for op in [CmpOp::Eq, CmpOp::Gt, CmpOp::Ge, CmpOp::Lt, CmpOp::Le] {
            let p = Predicate::Compare(NumericField::Rating, op, 4.0);
            assert!(!matches(&unrated, &p), "op = {op:?}");
        }
    }

    #[test]
    fn test_comparison_operators() {
        let rated = Recipe {
            rating: Some(4.0),
            ..recipe(1)
        };
        let cases = [
            (CmpOp::Eq, 4.0, true),
            (CmpOp::Eq, 4.5, false),
            (CmpOp::Ge, 4.0, true),
            (CmpOp::Gt, 4.0, false),
            (CmpOp::Le, 4.0, true),
            (CmpOp::Lt, 4.0, false),
            (CmpOp::Le, 3.5, false),
        ];
        for (op, value, expected) in cases {
            let p = Predicate::Compare(NumericField::Rating, op, value);
            assert_eq!(matches(&rated, &p), expected, "op = {op:?}, value = {value}");
        }
    }
}
