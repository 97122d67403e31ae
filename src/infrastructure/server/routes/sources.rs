//! Source CRUD plus the three ways of running a source: fetch-and-store,
//! try an unsaved configuration, and execute a saved one with arguments.

use super::super::dto::{
    DynamicArgs, ErrorResponse, RowCreatedResponse, SourceRunResponse, SourceTestRequest,
    SuccessResponse,
};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::application::tooling::{ExecutionOutcome, FailureHint, RequestDescriptor};
use crate::domain::records::{ExternalSource, SourceInput, SourceType};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

type RunResult = (StatusCode, Json<SourceRunResponse>);

#[utoipa::path(
    get,
    path = "/api/projects/{id}/sources",
    tag = "sources",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Sources configured for the project", body = [ExternalSource]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_sources<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<ExternalSource>>, ApiError> {
    let sources = state
        .db()
        .blocking(move |db| db.list_sources(&project_id))
        .await?;
    Ok(Json(sources))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/sources",
    tag = "sources",
    params(("id" = String, Path, description = "Project id")),
    request_body = SourceInput,
    responses(
        (status = 200, description = "Source created", body = RowCreatedResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(project_id): Path<String>,
    Json(payload): Json<SourceInput>,
) -> Result<Json<RowCreatedResponse>, ApiError> {
    let name = payload.name.clone();
    let owner = project_id.clone();
    let id = state
        .db()
        .blocking(move |db| db.create_source(&owner, &payload))
        .await?;
    info!(project_id = %project_id, source_id = id, name = %name, "Source created");
    Ok(Json(RowCreatedResponse { success: true, id }))
}

#[utoipa::path(
    put,
    path = "/api/sources/{id}",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    request_body = SourceInput,
    responses(
        (status = 200, description = "Source updated", body = SuccessResponse),
        (status = 404, description = "Unknown source", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn update_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
    Json(payload): Json<SourceInput>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let updated = state
        .db()
        .blocking(move |db| db.update_source(id, &payload))
        .await?;
    if !updated {
        return Err(source_not_found());
    }
    info!(source_id = id, "Source updated");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/sources/{id}",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    responses(
        (status = 200, description = "Source and its parameters removed", body = SuccessResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.db().blocking(move |db| db.delete_source(id)).await?;
    info!(source_id = id, "Source deleted");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/sources/{id}/fetch",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    responses(
        (status = 200, description = "Response stored as an external data entry", body = SourceRunResponse),
        (status = 404, description = "Unknown source", body = ErrorResponse),
        (status = 500, description = "Source could not be called", body = SourceRunResponse)
    )
)]
pub async fn fetch_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
) -> Result<RunResult, ApiError> {
    let source = load_source(&state, id).await?;
    let request = match RequestDescriptor::for_source(&source, &Map::new()) {
        Ok(request) => request,
        Err(err) => return Ok(run_failed(err.to_string())),
    };

    let outcome = state
        .executor()
        .execute(&request, FailureHint::BrowserFallback)
        .await;
    if !outcome.success {
        return Ok(outcome_response(outcome));
    }

    let content = outcome.body_text();
    let entry_id = state
        .db()
        .blocking(move |db| {
            db.add_entry(
                &source.project_id,
                &content,
                source.category.as_deref(),
                SourceType::External,
            )
        })
        .await?;
    info!(source_id = id, entry_id, "Stored fetched source data");
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    post,
    path = "/api/sources/test",
    tag = "sources",
    request_body = SourceTestRequest,
    responses(
        (status = 200, description = "Source answered", body = SourceRunResponse),
        (status = 500, description = "Source could not be called", body = SourceRunResponse)
    )
)]
pub async fn test_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Json(payload): Json<SourceTestRequest>,
) -> RunResult {
    let method = payload
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("GET");
    let request = match RequestDescriptor::from_raw(
        &payload.url,
        method,
        payload.headers.as_deref().unwrap_or_default(),
        payload.params.as_deref().unwrap_or_default(),
        &Map::new(),
    ) {
        Ok(request) => request,
        Err(err) => return run_failed(err.to_string()),
    };

    let outcome = state
        .executor()
        .execute(&request, FailureHint::BrowserFallback)
        .await;
    outcome_response(outcome)
}

#[utoipa::path(
    post,
    path = "/api/sources/execute/{id}",
    tag = "sources",
    params(("id" = i64, Path, description = "Source id")),
    request_body = DynamicArgs,
    responses(
        (status = 200, description = "Source answered", body = SourceRunResponse),
        (status = 404, description = "Unknown source", body = ErrorResponse),
        (status = 500, description = "Source could not be called", body = SourceRunResponse)
    )
)]
pub async fn execute_source<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<i64>,
    Json(DynamicArgs(args)): Json<DynamicArgs>,
) -> Result<RunResult, ApiError> {
    let source = load_source(&state, id).await?;
    let args = match args {
        Value::Object(args) => args,
        _ => Map::new(),
    };
    let request = match RequestDescriptor::for_source(&source, &args) {
        Ok(request) => request,
        Err(err) => return Ok(run_failed(err.to_string())),
    };

    let outcome = state
        .executor()
        .execute(&request, FailureHint::PublicReachability)
        .await;
    Ok(outcome_response(outcome))
}

async fn load_source<P: ModelProvider>(
    state: &ServerState<P>,
    id: i64,
) -> Result<ExternalSource, ApiError> {
    state
        .db()
        .blocking(move |db| db.source(id))
        .await?
        .ok_or_else(source_not_found)
}

fn source_not_found() -> ApiError {
    ApiError::NotFound("Source not found".into())
}

fn run_failed(error: String) -> RunResult {
    warn!(error = %error, "Source run failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SourceRunResponse::failed(error)),
    )
}

fn outcome_response(outcome: ExecutionOutcome) -> RunResult {
    match (outcome.success, outcome.error) {
        (true, _) => (StatusCode::OK, Json(SourceRunResponse::data(outcome.data))),
        (false, error) => run_failed(error.unwrap_or_default()),
    }
}
