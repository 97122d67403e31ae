use super::dispatch::ToolDispatcher;
use super::errors::ChatError;
use super::instructions::{results_message, system_instruction};
use super::models::{ProjectChatReply, ProjectChatRequest, ToolOutput};
use crate::application::tooling::synthesize_tools;
use crate::constants::QUOTA_EXHAUSTED_MESSAGE;
use crate::domain::tool::ToolDescriptor;
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use crate::types::{ChatMessage, FunctionCall, MessageRole};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a chat turn currently stands. The follow-up round never leads back
/// to `ToolDispatch`, so a turn makes at most two model calls.
enum Phase {
    ModelResponding { follow_up: bool },
    ToolDispatch(Vec<FunctionCall>),
    Done(String),
}

pub struct ProjectAssistant<P: ModelProvider> {
    provider: Arc<P>,
    dispatcher: ToolDispatcher,
    model: String,
}

impl<P: ModelProvider> ProjectAssistant<P> {
    pub fn new(provider: Arc<P>, dispatcher: ToolDispatcher, model: impl Into<String>) -> Self {
        Self {
            provider,
            dispatcher,
            model: model.into(),
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Answer one user message. Quota exhaustion on the provider side comes
    /// back as a fixed guidance reply; other model failures are errors.
    pub async fn chat(&self, request: ProjectChatRequest) -> Result<ProjectChatReply, ChatError> {
        match self.run(request).await {
            Err(ChatError::Model(err)) if err.is_quota_exhausted() => {
                warn!(error = %err, "Model quota exhausted");
                Ok(ProjectChatReply::text(QUOTA_EXHAUSTED_MESSAGE))
            }
            other => other,
        }
    }

    async fn run(&self, request: ProjectChatRequest) -> Result<ProjectChatReply, ChatError> {
        let ProjectChatRequest {
            project_id,
            project_name,
            message,
            history,
        } = request;
        info!(project_id = %project_id, "Project chat started");

        let tools = self
            .dispatcher
            .database()
            .blocking({
                let project_id = project_id.clone();
                move |db| Ok(synthesize_tools(db, &project_id))
            })
            .await?;
        let instruction = system_instruction(&project_id, &project_name, &tools);

        let mut messages = history;
        messages.push(ChatMessage::new(MessageRole::User, message));
        let mut tool_results = Vec::new();
        let mut dropped_tool_calls = 0;

        let mut phase = Phase::ModelResponding { follow_up: false };
        loop {
            phase = match phase {
                Phase::ModelResponding { follow_up } => {
                    let response = self.ask(&instruction, &messages, &tools).await?;
                    let calls = response.function_calls().to_vec();
                    if calls.is_empty() {
                        Phase::Done(response.text().to_string())
                    } else if follow_up {
                        dropped_tool_calls = calls.len();
                        warn!(
                            dropped = calls.len(),
                            "Model requested tools in the follow-up round; not executed"
                        );
                        Phase::Done(response.text().to_string())
                    } else {
                        messages.push(response.message);
                        Phase::ToolDispatch(calls)
                    }
                }
                Phase::ToolDispatch(calls) => {
                    tool_results = self.dispatch_all(&project_id, &calls).await;
                    messages.push(ChatMessage::new(
                        MessageRole::User,
                        results_message(&tool_results),
                    ));
                    Phase::ModelResponding { follow_up: true }
                }
                Phase::Done(reply) => {
                    info!(
                        project_id = %project_id,
                        tools_used = tool_results.len(),
                        "Project chat finished"
                    );
                    return Ok(ProjectChatReply {
                        reply,
                        tool_results,
                        dropped_tool_calls,
                    });
                }
            };
        }
    }

    async fn ask(
        &self,
        instruction: &str,
        messages: &[ChatMessage],
        tools: &[ToolDescriptor],
    ) -> Result<ModelResponse, ModelError> {
        debug!(messages = messages.len(), tools = tools.len(), "Submitting turn to model provider");
        self.provider
            .chat(ModelRequest {
                model: self.model.clone(),
                system_instruction: Some(instruction.to_string()),
                messages: messages.to_vec(),
                tools: tools.to_vec(),
            })
            .await
    }

    /// Sequential, in the order the model emitted the calls.
    async fn dispatch_all(&self, project_id: &str, calls: &[FunctionCall]) -> Vec<ToolOutput> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            if let Some(output) = self.dispatcher.dispatch(project_id, call).await {
                results.push(output);
            }
        }
        results
    }
}
