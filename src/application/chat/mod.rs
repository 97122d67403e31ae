//! Project chat: one model round, at most one tool dispatch round, one
//! follow-up model round.

mod dispatch;
mod errors;
mod instructions;
mod models;
mod runner;


pub use dispatch::ToolDispatcher;
pub use errors::ChatError;
pub use models::{ProjectChatReply, ProjectChatRequest, ToolOutput};
pub use runner::ProjectAssistant;
