use thiserror::Error;

/// Stored source configuration that cannot be turned into a request.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{field} is not valid JSON: {source}")]
    InvalidJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} must be a JSON object")]
    NotAnObject { field: &'static str },
}
