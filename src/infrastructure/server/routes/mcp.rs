use super::super::dto::{ErrorResponse, McpCallRequest, MessageParams};
use super::super::state::ServerState;
use crate::application::tooling::{ReportQuery, ToolCallResult};
use crate::constants::TEAM_COST_REPORT_TOOL;
use crate::infrastructure::model::ModelProvider;
use crate::infrastructure::rpc::{RpcRequest, handle_mcp_request};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// Bridge for browser clients that want the report tool without holding an
/// event stream open.
#[utoipa::path(
    post,
    path = "/api/mcp/call",
    tag = "mcp",
    request_body = McpCallRequest,
    responses(
        (status = 200, description = "Tool result", body = ToolCallResult),
        (status = 404, description = "Tool not found", body = ErrorResponse)
    )
)]
pub async fn mcp_call<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Json(payload): Json<McpCallRequest>,
) -> Response {
    if payload.name != TEAM_COST_REPORT_TOOL {
        warn!(tool = %payload.name, "MCP call for unknown tool");
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Tool not found".into(),
            }),
        )
            .into_response();
    }
    info!(tool = %payload.name, "MCP call via HTTP bridge");
    let result = state
        .reports()
        .fetch(&ReportQuery::from_args(&payload.arguments))
        .await;
    Json(result).into_response()
}

#[utoipa::path(
    get,
    path = "/sse",
    tag = "mcp",
    responses(
        (status = 200, description = "MCP event stream; the first event names the message endpoint")
    )
)]
pub async fn sse<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (guard, rx) = state.sessions().open();
    let endpoint = format!("/messages?sessionId={}", guard.id());

    let first = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });
    let replies = ReceiverStream::new(rx).map(move |payload| {
        let _session = &guard;
        Ok::<_, Infallible>(Event::default().event("message").data(payload))
    });

    Sse::new(first.chain(replies)).keep_alive(KeepAlive::default())
}

#[utoipa::path(
    post,
    path = "/messages",
    tag = "mcp",
    params(MessageParams),
    responses(
        (status = 202, description = "Accepted; any reply arrives on the event stream"),
        (status = 400, description = "No active SSE transport")
    )
)]
pub async fn messages<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Query(params): Query<MessageParams>,
    Json(request): Json<RpcRequest>,
) -> Response {
    let Some(sender) = params
        .session_id
        .as_deref()
        .and_then(|id| state.sessions().sender(id))
    else {
        return (StatusCode::BAD_REQUEST, "No active SSE transport").into_response();
    };

    if let Some(response) = handle_mcp_request(state.reports(), request).await {
        match serde_json::to_string(&response) {
            Ok(payload) => {
                if sender.send(payload).await.is_err() {
                    debug!(session_id = ?params.session_id, "MCP stream closed before reply");
                }
            }
            Err(err) => warn!(error = %err, "Failed to encode MCP reply"),
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
