use super::super::dto::{ErrorResponse, RowCreatedResponse, SuccessResponse};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::records::{DataEntry, NewDataEntry, SourceType};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/api/projects/{id}/data",
    tag = "data",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Data entries of the project", body = [DataEntry]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_entries<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<DataEntry>>, ApiError> {
    let entries = state
        .db()
        .blocking(move |db| db.list_entries(&project_id))
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/data",
    tag = "data",
    params(("id" = String, Path, description = "Project id")),
    request_body = NewDataEntry,
    responses(
        (status = 200, description = "Manual entry stored", body = RowCreatedResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn add_entry<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(project_id): Path<String>,
    Json(payload): Json<NewDataEntry>,
) -> Result<Json<RowCreatedResponse>, ApiError> {
    let owner = project_id.clone();
    let id = state
        .db()
        .blocking(move |db| {
            db.add_entry(
                &owner,
                &payload.content,
                payload.category.as_deref(),
                SourceType::Manual,
            )
        })
        .await?;
    debug!(project_id = %project_id, entry_id = id, "Data entry added");
    Ok(Json(RowCreatedResponse { success: true, id }))
}

#[utoipa::path(
    delete,
    path = "/api/data/{id}",
    tag = "data",
    params(("id" = i64, Path, description = "Data entry id")),
    responses(
        (status = 200, description = "Entry removed", body = SuccessResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_entry<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.db().blocking(move |db| db.delete_entry(id)).await?;
    Ok(Json(SuccessResponse::ok()))
}
