use super::dto::{
    DynamicArgs, ErrorResponse, McpCallRequest, ProjectChatBody, ProjectCreatedResponse, RowCreatedResponse,
    SourceRunResponse, SourceTestRequest, SuccessResponse,
};
use super::routes::{chat, data, mcp, params, projects, search, sources};
use crate::application::chat::{ProjectChatReply, ToolOutput};
use crate::application::tooling::{ToolCallResult, ToolContent};
use crate::domain::records::{
    DataEntry, ExternalSource, NewDataEntry, NewProject, NewSourceParam, ParamType, Project,
    SourceInput, SourceParam, SourceType,
};
use crate::infrastructure::storage::SearchHit;
use crate::types::{ChatMessage, FunctionCall, MessageRole};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Project Assistant API"),
    paths(
        projects::list_projects,
        projects::create_project,
        projects::delete_project,
        data::list_entries,
        data::add_entry,
        data::delete_entry,
        sources::list_sources,
        sources::create_source,
        sources::update_source,
        sources::delete_source,
        sources::fetch_source,
        sources::test_source,
        sources::execute_source,
        params::list_params,
        params::create_param,
        params::delete_param,
        search::search,
        chat::project_chat,
        mcp::mcp_call,
        mcp::sse,
        mcp::messages
    ),
    components(
        schemas(
            Project,
            NewProject,
            DataEntry,
            NewDataEntry,
            SourceType,
            ExternalSource,
            SourceInput,
            SourceParam,
            NewSourceParam,
            ParamType,
            SearchHit,
            ChatMessage,
            MessageRole,
            FunctionCall,
            ProjectChatBody,
            ProjectChatReply,
            ToolOutput,
            McpCallRequest,
            ToolCallResult,
            ToolContent,
            SourceTestRequest,
            DynamicArgs,
            SourceRunResponse,
            SuccessResponse,
            ProjectCreatedResponse,
            RowCreatedResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "projects", description = "Project management"),
        (name = "data", description = "Manually entered and fetched data points"),
        (name = "sources", description = "External HTTP data sources and their parameters"),
        (name = "search", description = "Keyword search used by the assistant"),
        (name = "chat", description = "Chat with the project assistant"),
        (name = "mcp", description = "Team cost report over MCP")
    )
)]
pub struct ApiDoc;
