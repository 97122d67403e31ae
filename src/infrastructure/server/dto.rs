use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectCreatedResponse {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RowCreatedResponse {
    pub success: bool,
    pub id: i64,
}

/// Outcome of running a source: `{success, data}` or `{success: false, error}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SourceRunResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceRunResponse {
    pub fn data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Arguments merged over a saved source's static params; anything other
/// than a JSON object counts as no arguments.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct DynamicArgs(pub Value);

/// An unsaved source configuration to try out.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SourceTestRequest {
    #[serde(default)]
    pub url: String,
    pub method: Option<String>,
    pub headers: Option<String>,
    pub params: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub project_id: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChatBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Defaults to the stored project name.
    pub project_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct McpCallRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageParams {
    pub session_id: Option<String>,
}
