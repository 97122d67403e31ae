//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::FunctionCall;

const PROVIDER_ID: &str = "gemini";

/// Gemini client for Google AI with function calling
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ModelConfig, api_key: String) -> Self {
        Self {
            base: HttpClientBase::new(PROVIDER_ID.to_string(), config.endpoint.clone(), api_key),
            api_path: config.api_path.clone(),
        }
    }

    fn build_model_url(&self, model: &str) -> String {
        let api_path = self.api_path.trim_matches('/');
        self.base
            .build_url(&format!("{api_path}/{model}:generateContent"))
    }

    fn build_payload(request: &ModelRequest) -> Value {
        let (history_system, contents) = MessageAdapter::to_gemini_format(&request.messages);
        let mut payload = json!({ "contents": contents });

        let system = match (request.system_instruction.as_deref(), history_system) {
            (Some(primary), Some(extra)) => Some(format!("{primary}\n\n{extra}")),
            (Some(primary), None) => Some(primary.to_string()),
            (None, extra) => extra,
        };
        if let Some(system) = system {
            payload["systemInstruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        if !request.tools.is_empty() {
            payload["tools"] = json!([{
                "functionDeclarations": MessageAdapter::to_function_declarations(&request.tools)
            }]);
        }
        payload
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.build_model_url(&request.model);
        let payload = Self::build_payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;

        let parts = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing candidate content"))?;

        let mut text = String::new();
        let mut calls = Vec::new();
        for part in parts {
            if let Some(fragment) = part.text {
                text.push_str(&fragment);
            }
            if let Some(call) = part.function_call {
                calls.push(FunctionCall::new(call.name, call.args.unwrap_or_default()));
            }
        }
        debug!(
            text_len = text.len(),
            function_calls = calls.len(),
            "Received response from Gemini"
        );

        Ok(ModelResponse::new(text, calls))
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Map<String, Value>>,
}
