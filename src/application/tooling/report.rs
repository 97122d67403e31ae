//! The fixed team cost report integration, exposed both to the chat model
//! and over the MCP bridge.

use super::executor::error_chain;
use super::request::param_string;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use url::Url;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub sale: Option<String>,
    pub team: Option<String>,
}

impl ReportQuery {
    /// Lenient conversion from model or JSON-RPC arguments; non-string
    /// values are stringified and missing dates become empty.
    pub fn from_args(args: &Map<String, Value>) -> Self {
        let text = |key: &str| args.get(key).filter(|v| !v.is_null()).map(param_string);
        Self {
            start_time: text("startTime").unwrap_or_default(),
            end_time: text("endTime").unwrap_or_default(),
            sale: text("sale"),
            team: text("team"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// MCP-shaped tool result: text content blocks plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// All text blocks joined, as handed to the model.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone)]
pub struct TeamCostReport {
    endpoint: String,
    http: Client,
}

impl TeamCostReport {
    pub fn new(endpoint: impl Into<String>, http: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the report URL; `sale` and `team` are only sent when non-empty.
    pub fn report_url(&self, query: &ReportQuery) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("startTime", &query.start_time);
            pairs.append_pair("endTime", &query.end_time);
            if let Some(sale) = query.sale.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("sale", sale);
            }
            if let Some(team) = query.team.as_deref().filter(|t| !t.is_empty()) {
                pairs.append_pair("team", team);
            }
        }
        Ok(url)
    }

    /// Never fails: errors come back as an `isError` result.
    pub async fn fetch(&self, query: &ReportQuery) -> ToolCallResult {
        match self.try_fetch(query).await {
            Ok(data) => {
                let text = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
                ToolCallResult::text(text)
            }
            Err(message) => {
                warn!(error = %message, "Team cost report failed");
                ToolCallResult::error(format!(
                    "Error fetching data: {message}. Note: This server is running in the cloud and may not be able to reach 192.168.x.x directly."
                ))
            }
        }
    }

    async fn try_fetch(&self, query: &ReportQuery) -> Result<Value, String> {
        let url = self.report_url(query).map_err(|err| err.to_string())?;
        info!(
            start_time = %query.start_time,
            end_time = %query.end_time,
            "Fetching team cost report"
        );
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| error_chain(&err))?;
        let body = response.text().await.map_err(|err| error_chain(&err))?;
        serde_json::from_str(&body).map_err(|err| err.to_string())
    }
}
