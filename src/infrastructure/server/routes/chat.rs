use super::super::dto::{ErrorResponse, ProjectChatBody};
use super::super::error::ApiError;
use super::super::state::ServerState;
use crate::application::chat::{ChatError, ProjectChatReply, ProjectChatRequest};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::{error, info};

#[utoipa::path(
    post,
    path = "/api/projects/{id}/chat",
    tag = "chat",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectChatBody,
    responses(
        (status = 200, description = "Assistant reply", body = ProjectChatReply),
        (status = 404, description = "Unknown project", body = ErrorResponse),
        (status = 502, description = "Model provider failed", body = ErrorResponse)
    )
)]
pub async fn project_chat<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(project_id): Path<String>,
    Json(payload): Json<ProjectChatBody>,
) -> Result<Json<ProjectChatReply>, ApiError> {
    let lookup = project_id.clone();
    let project = state
        .db()
        .blocking(move |db| db.project(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;
    info!(project_id = %project_id, history = payload.history.len(), "Received project chat");

    let request = ProjectChatRequest {
        project_id,
        project_name: payload
            .project_name
            .filter(|name| !name.is_empty())
            .unwrap_or(project.name),
        message: payload.message,
        history: payload.history,
    };

    match state.assistant().chat(request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(ChatError::Store(err)) => Err(ApiError::Store(err)),
        Err(err) => {
            error!(error = %err, "Project chat failed");
            Err(ApiError::Upstream(err.user_message()))
        }
    }
}
