//! Turns a source configuration plus model-supplied arguments into a concrete
//! HTTP request.

use super::error::SourceError;
use crate::domain::records::ExternalSource;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// A ready-to-send HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// Merge `dynamic_args` over `static_params` and encode the result.
    ///
    /// `GET` (exact, case-sensitive) appends a query string to the URL; any
    /// other method sends the merged mapping as a JSON body with
    /// `Content-Type: application/json`. Keys already present in the URL are
    /// not deduplicated.
    pub fn build(
        url: &str,
        method: &str,
        headers: &Map<String, Value>,
        static_params: &Map<String, Value>,
        dynamic_args: &Map<String, Value>,
    ) -> Self {
        let mut merged = static_params.clone();
        for (key, value) in dynamic_args {
            merged.insert(key.clone(), value.clone());
        }

        let mut header_map: BTreeMap<String, String> = headers
            .iter()
            .map(|(name, value)| (name.clone(), param_string(value)))
            .collect();

        if method == "GET" {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(merged.iter().map(|(key, value)| (key, param_string(value))))
                .finish();
            let url = if query.is_empty() {
                url.to_string()
            } else if url.contains('?') {
                format!("{url}&{query}")
            } else {
                format!("{url}?{query}")
            };
            Self {
                method: method.to_string(),
                url,
                headers: header_map,
                body: None,
            }
        } else {
            header_map.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
            header_map.insert("Content-Type".to_string(), "application/json".to_string());
            Self {
                method: method.to_string(),
                url: url.to_string(),
                headers: header_map,
                body: Some(Value::Object(merged).to_string()),
            }
        }
    }

    /// Build from raw stored text; `headers` and `params` must be JSON objects.
    pub fn from_raw(
        url: &str,
        method: &str,
        headers: &str,
        params: &str,
        dynamic_args: &Map<String, Value>,
    ) -> Result<Self, SourceError> {
        let headers = parse_json_object("headers", headers)?;
        let static_params = parse_json_object("params", params)?;
        Ok(Self::build(url, method, &headers, &static_params, dynamic_args))
    }

    pub fn for_source(
        source: &ExternalSource,
        dynamic_args: &Map<String, Value>,
    ) -> Result<Self, SourceError> {
        Self::from_raw(
            &source.url,
            &source.method,
            &source.headers,
            &source.params,
            dynamic_args,
        )
    }
}

/// Parse a stored JSON object; blank text counts as `{}`.
pub fn parse_json_object(field: &'static str, raw: &str) -> Result<Map<String, Value>, SourceError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SourceError::NotAnObject { field }),
        Err(source) => Err(SourceError::InvalidJson { field, source }),
    }
}

/// Text form of a parameter value as it appears in a query string or header.
pub fn param_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items.iter().map(param_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}
