//! Message adapters - convert conversation and tools to the Gemini wire format

use crate::domain::records::ParamType;
use crate::domain::tool::ToolDescriptor;
use crate::types::{ChatMessage, MessageRole};
use serde_json::{Map, Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to Gemini format
    /// Returns: (system_instruction_text, contents)
    pub fn to_gemini_format(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            let role = match message.role {
                MessageRole::System => {
                    system_parts.push(message.content.clone());
                    continue;
                }
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            };

            let mut parts = Vec::new();
            if !message.content.is_empty() {
                parts.push(json!({ "text": message.content }));
            }
            for call in &message.function_calls {
                parts.push(json!({
                    "functionCall": { "name": call.name, "args": call.args }
                }));
            }
            if parts.is_empty() {
                continue;
            }
            contents.push(json!({ "role": role, "parts": parts }));
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system_instruction, contents)
    }

    /// Convert tool descriptors to a Gemini `functionDeclarations` array
    pub fn to_function_declarations(tools: &[ToolDescriptor]) -> Vec<Value> {
        tools.iter().map(Self::function_declaration).collect()
    }

    fn function_declaration(tool: &ToolDescriptor) -> Value {
        let mut declaration = json!({
            "name": tool.name,
            "description": tool.description,
        });
        if tool.parameters.is_empty() {
            return declaration;
        }

        let mut properties = Map::new();
        for param in &tool.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": gemini_type(param.param_type),
                    "description": param.description,
                }),
            );
        }
        declaration["parameters"] = json!({
            "type": "OBJECT",
            "properties": properties,
            "required": tool.required,
        });
        declaration
    }
}

fn gemini_type(param_type: ParamType) -> &'static str {
    match param_type {
        ParamType::String => "STRING",
        ParamType::Number => "NUMBER",
    }
}
