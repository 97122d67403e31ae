//! Sends built requests to external sources and normalises the outcome.

use super::request::RequestDescriptor;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use tracing::{debug, warn};

/// Substrings that mark a failure to reach the host at all.
const UNREACHABLE_MARKERS: [&str; 7] = [
    "ENOTFOUND",
    "ECONNREFUSED",
    "fetch failed",
    "Connection refused",
    "connection refused",
    "dns error",
    "failed to lookup address",
];

/// Which remedy an unreachable-host message should suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureHint {
    /// Interactive testing: suggest retrying from the user's own browser.
    BrowserFallback,
    /// Model-driven execution: the address must be publicly reachable.
    PublicReachability,
}

impl FailureHint {
    pub fn message(self, url: &str) -> String {
        match self {
            FailureHint::BrowserFallback => format!(
                "云端服务器无法访问该地址 ({url})。如果是局域网 IP (如 192.168.x.x)，请尝试使用“本地浏览器测试”模式。"
            ),
            FailureHint::PublicReachability => format!(
                "云端服务器无法访问该地址 ({url})。如果是局域网 IP (如 192.168.x.x)，请确保该地址在公网可访问，AI 才能读取数据。"
            ),
        }
    }
}

/// Replace low-level unreachable-host errors with a localized hint; other
/// messages pass through unchanged.
pub fn classify_failure(url: &str, message: &str, connect_failed: bool, hint: FailureHint) -> String {
    if connect_failed || UNREACHABLE_MARKERS.iter().any(|marker| message.contains(marker)) {
        hint.message(url)
    } else {
        message.to_string()
    }
}

/// Result of one source call. Non-JSON bodies are kept as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionOutcome {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            status: None,
            data: Value::Null,
            error: Some(error),
        }
    }

    /// Text handed back to the model: the raw body for strings, compact JSON
    /// otherwise.
    pub fn body_text(&self) -> String {
        match &self.data {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SourceExecutor {
    http: Client,
}

impl SourceExecutor {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// One attempt, no retry. Network failures are folded into the outcome.
    pub async fn execute(&self, request: &RequestDescriptor, hint: FailureHint) -> ExecutionOutcome {
        let method = match Method::from_bytes(request.method.as_bytes()) {
            Ok(method) => method,
            Err(_) => {
                return ExecutionOutcome::failed(format!(
                    "invalid HTTP method: {}",
                    request.method
                ));
            }
        };

        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "Calling external source");
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let message = error_chain(&err);
                warn!(url = %request.url, error = %message, "External source request failed");
                return ExecutionOutcome::failed(classify_failure(
                    &request.url,
                    &message,
                    err.is_connect(),
                    hint,
                ));
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                let message = error_chain(&err);
                warn!(url = %request.url, error = %message, "Failed to read source response");
                return ExecutionOutcome {
                    status: Some(status),
                    ..ExecutionOutcome::failed(message)
                };
            }
        };

        let data = serde_json::from_str(&text).unwrap_or(Value::String(text));
        ExecutionOutcome {
            success: true,
            status: Some(status),
            data,
            error: None,
        }
    }
}

/// reqwest keeps the interesting part (refused, dns) in nested sources.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
