use crate::api::ErrorResponse;
use crate::models::Recipe;
use crate::query::{RecipeQuery, SearchParams};
use crate::store::RecipeStore;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<Recipe>,
    /// Total count of recipes matching the filters, ignoring pagination
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes/search",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Recipes matching the filters", body = SearchResponse),
        (status = 400, description = "Malformed numeric filter", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(store): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    // Validate before querying; a bad numeric payload is the client's error,
    // never a silent NaN comparison.
    let query = match RecipeQuery::from_params(&params) {
        Ok(q) => q,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    run_query(store.as_ref(), &query)
}

/// Shared execution path for the search and plain listing endpoints; the
/// listing is just the empty-predicate case.
pub(crate) fn run_query(store: &dyn RecipeStore, query: &RecipeQuery) -> Response {
    match store.search(query) {
        Ok(page) => (
            StatusCode::OK,
            Json(SearchResponse {
                data: page.recipes,
                total: page.total,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "recipe search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
