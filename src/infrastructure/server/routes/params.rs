use super::super::dto::{ErrorResponse, RowCreatedResponse, SuccessResponse};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::records::{NewSourceParam, SourceParam};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/api/sources/{id}/params",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    responses(
        (status = 200, description = "Declared dynamic parameters", body = [SourceParam]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_params<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(source_id): Path<i64>,
) -> Result<Json<Vec<SourceParam>>, ApiError> {
    let params = state
        .db()
        .blocking(move |db| db.list_params(source_id))
        .await?;
    Ok(Json(params))
}

#[utoipa::path(
    post,
    path = "/api/sources/{id}/params",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    request_body = NewSourceParam,
    responses(
        (status = 200, description = "Parameter declared", body = RowCreatedResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_param<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(source_id): Path<i64>,
    Json(payload): Json<NewSourceParam>,
) -> Result<Json<RowCreatedResponse>, ApiError> {
    let name = payload.name.clone();
    let id = state
        .db()
        .blocking(move |db| db.create_param(source_id, &payload))
        .await?;
    debug!(source_id, param_id = id, name = %name, "Source parameter added");
    Ok(Json(RowCreatedResponse { success: true, id }))
}

#[utoipa::path(
    delete,
    path = "/api/params/{id}",
    tag = "sources",
    params(("id" = i64, Path, description = "Parameter id")),
    responses(
        (status = 200, description = "Parameter removed", body = SuccessResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_param<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.db().blocking(move |db| db.delete_param(id)).await?;
    Ok(Json(SuccessResponse::ok()))
}
