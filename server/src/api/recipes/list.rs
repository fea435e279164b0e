use crate::api::ErrorResponse;
use crate::query::{ListParams, RecipeQuery};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use super::search::{self, SearchResponse};

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated listing of all recipes, newest id first", body = SearchResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(store): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let query = RecipeQuery::unfiltered(params.page, params.limit);
    search::run_query(store.as_ref(), &query)
}
