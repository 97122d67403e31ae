//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Trait for model provider implementations
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send one conversation turn (with the tools on offer) to the model
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
