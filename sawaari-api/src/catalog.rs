use axum::{extract::State, routing::get, Json, Router};

use sawaari_catalog::routes::RouteListing;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/routes/all", get(list_routes))
}

/// Active routes plus the derived city lists for the search form.
async fn list_routes(State(state): State<AppState>) -> Result<Json<RouteListing>, ApiError> {
    Ok(Json(state.catalog.list_active().await?))
}
