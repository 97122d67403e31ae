use super::super::dto::{ErrorResponse, SearchParams};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::application::tooling::search_project_data;
use crate::infrastructure::model::ModelProvider;
use crate::infrastructure::storage::SearchHit;
use axum::Json;
use axum::extract::{Query, State};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/ai/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching entries, or every entry when none match", body = [SearchHit]),
        (status = 400, description = "projectId missing", body = ErrorResponse)
    )
)]
pub async fn search<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let Some(project_id) = params.project_id.filter(|id| !id.is_empty()) else {
        return Err(ApiError::BadRequest("projectId is required".into()));
    };
    let query = params.query.unwrap_or_default();
    let hits = state
        .db()
        .blocking(move |db| search_project_data(db, &project_id, &query))
        .await?;
    Ok(Json(hits))
}
