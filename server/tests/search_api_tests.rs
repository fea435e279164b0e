//! End-to-end tests for the browsing endpoints over the in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use larder_server::models::Recipe;
use larder_server::query::RecipeQuery;
use larder_server::store::{InMemoryRecipeStore, RecipePage, RecipeStore, StoreError};
use larder_server::AppState;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

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
        nutrients: HashMap::new(),
        serves: "2 servings".to_string(),
        continent: None,
        country_state: None,
        ingredients: Vec::new(),
        instructions: Vec::new(),
        url_link: None,
    }
}

fn app_with(recipes: Vec<Recipe>) -> Router {
    let store: AppState = Arc::new(InMemoryRecipeStore::new(recipes));
    Router::new()
        .nest("/api/recipes", larder_server::api::recipes::router())
        .with_state(store)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_plain_listing_pages_by_id_descending() {
    let app = app_with((1..=20).map(recipe).collect());

    let (status, body) = get_json(app.clone(), "/api/recipes?limit=15&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(ids(&body), (6..=20).rev().collect::<Vec<_>>());

    let (status, body) = get_json(app, "/api/recipes?limit=15&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(ids(&body), (1..=5).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_concatenated_pages_cover_every_id_once() {
    let app = app_with((1..=47).map(recipe).collect());

    let mut seen = Vec::new();
    for page in 1..=5 {
        let (_, body) = get_json(app.clone(), &format!("/api/recipes?limit=10&page={page}")).await;
        seen.extend(ids(&body));
    }

    assert_eq!(seen, (1..=47).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_page_beyond_range_keeps_total() {
    let app = app_with((1..=20).map(recipe).collect());

    let (status, body) = get_json(app, "/api/recipes?limit=15&page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_title_filter_is_case_insensitive_substring() {
    let mut recipes = vec![recipe(1), recipe(2), recipe(3)];
    recipes[0].title = "Tomato Soup".to_string();
    recipes[1].title = "soup of the day".to_string();
    recipes[2].title = "Grilled Cheese".to_string();
    let app = app_with(recipes);

    let (status, body) = get_json(app, "/api/recipes/search?title=SOUP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(ids(&body), vec![2, 1]);
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let mut recipes: Vec<Recipe> = (1..=30).map(recipe).collect();
    for r in recipes.iter_mut().take(12) {
        r.cuisine = "Southern Recipes".to_string();
    }
    let app = app_with(recipes);

    let (_, first) = get_json(app.clone(), "/api/recipes/search?cuisine=southern&limit=5").await;
    let (_, second) = get_json(app, "/api/recipes/search?cuisine=southern&limit=5").await;
    assert_eq!(first, second);
    assert_eq!(first["total"], 12);
}

#[tokio::test]
async fn test_rating_exact_and_at_most() {
    let mut recipes = vec![recipe(1), recipe(2), recipe(3), recipe(4)];
    recipes[0].rating = Some(4.0);
    recipes[1].rating = Some(3.5);
    recipes[2].rating = Some(4.8);
    recipes[3].rating = None;
    let app = app_with(recipes);

    let (_, body) = get_json(app.clone(), "/api/recipes/search?rating=4").await;
    assert_eq!(ids(&body), vec![1]);

    // Null-rated recipes never match a comparison.
    let (_, body) = get_json(app, "/api/recipes/search?rating=%3C%3D4").await;
    assert_eq!(body["total"], 2);
    assert_eq!(ids(&body), vec![2, 1]);
}

#[tokio::test]
async fn test_serves_prefix_match() {
    let mut recipes = vec![recipe(1), recipe(2)];
    recipes[0].serves = "4 servings".to_string();
    recipes[1].serves = "14 servings".to_string();
    let app = app_with(recipes);

    let (_, body) = get_json(app, "/api/recipes/search?serves=4").await;
    assert_eq!(body["total"], 1);
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_filters_are_conjunctive() {
    let mut recipes = vec![recipe(1), recipe(2), recipe(3)];
    recipes[0].title = "Tomato Soup".to_string();
    recipes[0].total_time = Some(30.0);
    recipes[1].title = "Tomato Salad".to_string();
    recipes[1].total_time = Some(10.0);
    recipes[2].title = "Onion Soup".to_string();
    recipes[2].total_time = Some(90.0);
    let app = app_with(recipes);

    let (_, body) = get_json(app, "/api/recipes/search?title=soup&total_time=%3C%3D45").await;
    assert_eq!(body["total"], 1);
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_malformed_numeric_filter_is_bad_request() {
    let app = app_with(vec![recipe(1)]);

    let (status, body) = get_json(app.clone(), "/api/recipes/search?rating=%3C%3Dabc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rating"));

    // "NaN" parses as a float in Rust but must still be rejected.
    let (status, _) = get_json(app, "/api/recipes/search?total_time=NaN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_pagination_is_treated_as_default() {
    let app = app_with((1..=20).map(recipe).collect());

    // Invalid page falls back to page 1 with a normal 200, not a
    // deserialization error.
    let (status, body) = get_json(app.clone(), "/api/recipes/search?page=abc&limit=15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(ids(&body), (6..=20).rev().collect::<Vec<_>>());

    let (status, body) = get_json(app, "/api/recipes?page=abc&limit=junk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(ids(&body), (6..=20).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_get_recipe_and_not_found() {
    let app = app_with(vec![recipe(7)]);

    let (status, body) = get_json(app.clone(), "/api/recipes/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    assert_eq!(body["title"], "Recipe 7");

    let (status, body) = get_json(app, "/api/recipes/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Recipe not found");
}

/// Store that always fails, for the 500 path.
struct FailingStore;

impl RecipeStore for FailingStore {
    fn search(&self, _query: &RecipeQuery) -> Result<RecipePage, StoreError> {
        Err(StoreError::Query("relation \"recipes\" does not exist".to_string()))
    }

    fn get(&self, _id: i32) -> Result<Option<Recipe>, StoreError> {
        Err(StoreError::Connection("pool timed out".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_is_internal_error_with_message() {
    let store: AppState = Arc::new(FailingStore);
    let app = Router::new()
        .nest("/api/recipes", larder_server::api::recipes::router())
        .with_state(store);

    let (status, body) = get_json(app.clone(), "/api/recipes/search?title=soup").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("does not exist"));

    let (status, body) = get_json(app, "/api/recipes/3").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("pool timed out"));
}
