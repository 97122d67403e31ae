use super::super::dto::{ErrorResponse, ProjectCreatedResponse, SuccessResponse};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::domain::records::{NewProject, Project};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "All projects", body = [Project]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_projects<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.db().blocking(|db| db.list_projects()).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = NewProject,
    responses(
        (status = 200, description = "Project created", body = ProjectCreatedResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_project<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Json(payload): Json<NewProject>,
) -> Result<Json<ProjectCreatedResponse>, ApiError> {
    let id = state
        .db()
        .blocking(move |db| db.create_project(payload))
        .await?;
    Ok(Json(ProjectCreatedResponse { success: true, id }))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project and all its rows removed", body = SuccessResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_project<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let target = id.clone();
    state
        .db()
        .blocking(move |db| db.delete_project(&target))
        .await?;
    info!(project_id = %id, "Project deleted");
    Ok(Json(SuccessResponse::ok()))
}
