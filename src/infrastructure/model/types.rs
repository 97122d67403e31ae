//! Model types - Request, Response, and Error types

use crate::domain::tool::ToolDescriptor;
use crate::types::{ChatMessage, FunctionCall, MessageRole};
use reqwest::StatusCode;
use thiserror::Error;

/// Model request for LLM chat
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDescriptor>,
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
}

impl ModelResponse {
    pub fn new(content: String, function_calls: Vec<FunctionCall>) -> Self {
        Self {
            message: ChatMessage::new(MessageRole::Assistant, content)
                .with_function_calls(function_calls),
        }
    }

    pub fn text(&self) -> &str {
        &self.message.content
    }

    pub fn function_calls(&self) -> &[FunctionCall] {
        &self.message.function_calls
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' answered {status}: {body}")]
    Status {
        provider: String,
        status: StatusCode,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn status(provider: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Rate limiting or an exhausted quota on the provider side.
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            ModelError::Status { status, body, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED")
            }
            ModelError::Network { source, .. } => {
                source.status() == Some(StatusCode::TOO_MANY_REQUESTS)
            }
            ModelError::InvalidResponse { .. } => false,
        }
    }

    /// User-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("无法连接到模型服务 '{provider}'，请检查网络。")
                } else if source.is_timeout() {
                    format!("请求模型服务 '{provider}' 超时，请稍后重试。")
                } else {
                    format!("调用模型服务 '{provider}' 时发生网络错误。")
                }
            }
            ModelError::Status {
                provider, status, ..
            } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                    format!("模型服务 '{provider}' 拒绝了请求，请检查 API Key 配置。")
                }
                StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                    format!("模型服务 '{provider}' 暂时不可用，请稍后重试。")
                }
                other => format!("模型服务 '{provider}' 请求失败: {}", other.as_u16()),
            },
            ModelError::InvalidResponse { provider, .. } => {
                format!("模型服务 '{provider}' 返回了无法解析的响应。")
            }
        }
    }
}
