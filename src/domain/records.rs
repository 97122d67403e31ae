//! Persisted records and the request shapes used to create them.
//!
//! Field names follow the storage columns (`project_id`, `source_type`, ...)
//! since the HTTP API hands rows back as-is.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category assigned to sources created without one.
pub const DEFAULT_SOURCE_CATEGORY: &str = "常规";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Manual,
    External,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Manual => "manual",
            SourceType::External => "external",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "external" => SourceType::External,
            _ => SourceType::Manual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataEntry {
    pub id: i64,
    pub project_id: String,
    pub content: String,
    pub category: Option<String>,
    pub source_type: SourceType,
}

/// An external HTTP endpoint configured for a project.
///
/// `headers` and `params` hold JSON objects serialized as text; rows stored
/// with `NULL` are read back as `"{}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExternalSource {
    pub id: i64,
    pub project_id: String,
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: String,
    pub params: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
        }
    }

    /// Anything other than `number` is treated as a string.
    pub fn parse(value: &str) -> Self {
        match value {
            "number" => ParamType::Number,
            _ => ParamType::String,
        }
    }
}

/// A dynamic argument the model may supply when invoking a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceParam {
    pub id: i64,
    pub source_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewProject {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewDataEntry {
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
}

/// Source fields as submitted by clients, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SourceInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub method: Option<String>,
    pub headers: Option<String>,
    pub params: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl SourceInput {
    pub fn method_or_default(&self) -> &str {
        non_empty(self.method.as_deref()).unwrap_or("GET")
    }

    pub fn headers_or_default(&self) -> &str {
        non_empty(self.headers.as_deref()).unwrap_or("{}")
    }

    pub fn params_or_default(&self) -> &str {
        non_empty(self.params.as_deref()).unwrap_or("{}")
    }

    pub fn category_or_default(&self) -> &str {
        non_empty(self.category.as_deref()).unwrap_or(DEFAULT_SOURCE_CATEGORY)
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewSourceParam {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub required: bool,
    pub format: Option<String>,
}

/// Accepts `true`/`false` as well as `1`/`0` style flags.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        serde_json::Value::Null => false,
        _ => true,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
