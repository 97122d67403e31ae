use crate::types::ChatMessage;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct ProjectChatRequest {
    pub project_id: String,
    pub project_name: String,
    pub message: String,
    pub history: Vec<ChatMessage>,
}

/// Content one tool call produced, as it was reported back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ToolOutput {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChatReply {
    pub reply: String,
    pub tool_results: Vec<ToolOutput>,
    /// Tool calls requested in the follow-up round, which are not executed.
    pub dropped_tool_calls: usize,
}

impl ProjectChatReply {
    pub(crate) fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            tool_results: Vec::new(),
            dropped_tool_calls: 0,
        }
    }
}
