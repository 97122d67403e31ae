//! MCP over server-sent events: a registry of live streams keyed by session
//! id, and the JSON-RPC methods the report server answers.
//!
//! A client opens `GET /sse`, receives an `endpoint` event naming its
//! `/messages?sessionId=...` URL, and posts JSON-RPC requests there. Replies
//! travel back as `message` events on the stream.

use super::types::{RpcRequest, RpcResponse};
use crate::application::tooling::{ReportQuery, TeamCostReport, team_cost_report_tool};
use crate::constants::{
    MCP_PROTOCOL_VERSION, MCP_SERVER_NAME, MCP_SERVER_VERSION, TEAM_COST_REPORT_TOOL,
};
use crate::domain::tool::ToolDescriptor;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SESSION_BUFFER: usize = 32;

type Sessions = HashMap<String, mpsc::Sender<String>>;

/// Live event streams, one per connected MCP client.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<Sessions>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new stream. The session lives until the returned guard is
    /// dropped.
    pub fn open(&self) -> (SessionGuard, mpsc::Receiver<String>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id.clone(), tx);
        info!(session_id = %id, "MCP session opened");
        (
            SessionGuard {
                id,
                registry: self.clone(),
            },
            rx,
        )
    }

    pub fn sender(&self, session_id: &str) -> Option<mpsc::Sender<String>> {
        self.lock().get(session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, session_id: &str) {
        if self.lock().remove(session_id).is_some() {
            info!(session_id, "MCP session closed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Unregisters its session when dropped, i.e. when the SSE stream goes away.
pub struct SessionGuard {
    id: String,
    registry: SessionRegistry,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

/// Answer one JSON-RPC message; notifications yield `None`.
pub async fn handle_mcp_request(reports: &TeamCostReport, request: RpcRequest) -> Option<RpcResponse> {
    debug!(method = %request.method, "Received MCP message");

    if request.jsonrpc != "2.0" {
        return Some(RpcResponse::invalid_request(
            request.id,
            "Unsupported jsonrpc version (expected 2.0)",
        ));
    }

    if request.is_notification() {
        debug!(method = %request.method, "MCP notification acknowledged");
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        "initialize" => RpcResponse::success(id, initialize_result(request.params.as_ref())),
        "ping" => RpcResponse::success(id, json!({})),
        "tools/list" => RpcResponse::success(
            id,
            json!({ "tools": [tool_listing(&team_cost_report_tool())] }),
        ),
        "tools/call" => call_tool(reports, id, request.params).await,
        other => {
            warn!(method = other, "Unknown MCP method");
            RpcResponse::method_not_found(id, other)
        }
    };
    Some(response)
}

fn initialize_result(params: Option<&Value>) -> Value {
    let protocol = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(MCP_PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": MCP_SERVER_NAME, "version": MCP_SERVER_VERSION },
    })
}

/// MCP tool entry with a JSON Schema `inputSchema`.
pub fn tool_listing(tool: &ToolDescriptor) -> Value {
    let properties: Map<String, Value> = tool
        .parameters
        .iter()
        .map(|param| {
            (
                param.name.clone(),
                json!({ "type": param.param_type.as_str(), "description": param.description }),
            )
        })
        .collect();
    json!({
        "name": tool.name,
        "description": tool.description,
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": tool.required,
        },
    })
}

async fn call_tool(reports: &TeamCostReport, id: Option<Value>, params: Option<Value>) -> RpcResponse {
    let params = params.unwrap_or(Value::Null);
    let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
    if name != TEAM_COST_REPORT_TOOL {
        return RpcResponse::invalid_params(id, format!("Tool {name} not found"));
    }

    let arguments = match params.get("arguments") {
        Some(Value::Object(arguments)) => arguments.clone(),
        _ => Map::new(),
    };
    let missing: Vec<&str> = ["startTime", "endTime"]
        .into_iter()
        .filter(|key| !arguments.get(*key).is_some_and(Value::is_string))
        .collect();
    if !missing.is_empty() {
        return RpcResponse::invalid_params(
            id,
            format!(
                "Invalid arguments for tool {name}: {} must be strings",
                missing.join(", ")
            ),
        );
    }

    let result = reports.fetch(&ReportQuery::from_args(&arguments)).await;
    match serde_json::to_value(&result) {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, -32603, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc(method: &str, params: Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params: Some(params),
            id: Some(json!(1)),
        }
    }

    fn offline_reports() -> TeamCostReport {
        TeamCostReport::new("http://127.0.0.1:9/cost", Client::new())
    }

    #[test]
    fn sessions_are_removed_with_their_guard() {
        let registry = SessionRegistry::new();
        let (first, _rx1) = registry.open();
        let (second, _rx2) = registry.open();
        assert_ne!(first.id(), second.id());
        assert_eq!(registry.len(), 2);
        assert!(registry.sender(first.id()).is_some());

        let first_id = first.id().to_string();
        drop(first);
        assert!(registry.sender(&first_id).is_none());
        assert!(registry.sender(second.id()).is_some());
        drop(second);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn initialize_announces_server() {
        let response = handle_mcp_request(&offline_reports(), rpc("initialize", json!({})))
            .await
            .expect("reply");
        let result = response.result.expect("result");
        assert_eq!(result["serverInfo"]["name"], json!("Internal Report Server"));
        assert_eq!(result["serverInfo"]["version"], json!("1.0.0"));
        assert_eq!(result["protocolVersion"], json!(MCP_PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn tools_list_has_only_the_report() {
        let response = handle_mcp_request(&offline_reports(), rpc("tools/list", json!({})))
            .await
            .expect("reply");
        let tools = response.result.expect("result")["tools"].clone();
        assert_eq!(tools.as_array().map(Vec::len), Some(1));
        assert_eq!(tools[0]["name"], json!("get_team_cost_report"));
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["startTime", "endTime"]));
        assert_eq!(
            tools[0]["inputSchema"]["properties"]["team"]["type"],
            json!("string")
        );
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let mut request = rpc("notifications/initialized", json!({}));
        request.id = None;
        assert!(handle_mcp_request(&offline_reports(), request).await.is_none());
    }

    #[tokio::test]
    async fn unknown_tool_and_method_are_errors() {
        let response = handle_mcp_request(
            &offline_reports(),
            rpc("tools/call", json!({"name": "drop_tables"})),
        )
        .await
        .expect("reply");
        assert_eq!(response.error.expect("error").code, -32602);

        let response = handle_mcp_request(&offline_reports(), rpc("resources/list", json!({})))
            .await
            .expect("reply");
        assert_eq!(response.error.expect("error").code, -32601);
    }

    #[tokio::test]
    async fn missing_dates_are_rejected() {
        let response = handle_mcp_request(
            &offline_reports(),
            rpc(
                "tools/call",
                json!({"name": "get_team_cost_report", "arguments": {"startTime": "2024-01-01"}}),
            ),
        )
        .await
        .expect("reply");
        let error = response.error.expect("error");
        assert!(error.message.contains("endTime"));
    }

    #[tokio::test]
    async fn tools_call_fetches_the_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("startTime", "2024-01-01"))
            .and(query_param("endTime", "2024-01-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let reports = TeamCostReport::new(format!("{}/cost", server.uri()), Client::new());
        let response = handle_mcp_request(
            &reports,
            rpc(
                "tools/call",
                json!({
                    "name": "get_team_cost_report",
                    "arguments": {"startTime": "2024-01-01", "endTime": "2024-01-31"}
                }),
            ),
        )
        .await
        .expect("reply");
        let result = response.result.expect("result");
        assert_eq!(result["content"][0]["type"], json!("text"));
        assert!(result.get("isError").is_none());
    }
}
