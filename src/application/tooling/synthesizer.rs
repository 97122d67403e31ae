//! Builds the tool set offered to the model for one chat turn.
//!
//! Per-source tools come from live rows every time; nothing here is cached so
//! edits to sources or params show up on the next turn.

use crate::constants::{EXTERNAL_SOURCE_TOOL_PREFIX, SEARCH_TOOL, TEAM_COST_REPORT_TOOL};
use crate::domain::records::{ExternalSource, ParamType, SourceParam};
use crate::domain::tool::ToolDescriptor;
use crate::infrastructure::storage::Database;
use tracing::{debug, warn};

pub fn search_tool() -> ToolDescriptor {
    ToolDescriptor::new(
        SEARCH_TOOL,
        "Search for specific data points or information within a project's database.",
    )
    .param(
        "projectId",
        ParamType::String,
        "The unique ID of the project to search in.",
        true,
    )
    .param(
        "query",
        ParamType::String,
        "The search query or keyword to look for in the project data.",
        true,
    )
}

pub fn team_cost_report_tool() -> ToolDescriptor {
    ToolDescriptor::new(TEAM_COST_REPORT_TOOL, "获取团队成本报告数据")
        .param("startTime", ParamType::String, "开始日期 (YYYY-MM-DD)", true)
        .param("endTime", ParamType::String, "结束日期 (YYYY-MM-DD)", true)
        .param("sale", ParamType::String, "销售人员姓名", false)
        .param("team", ParamType::String, "团队名称", false)
}

/// One tool for one source; parameters follow the stored param order.
pub fn external_source_tool(source: &ExternalSource, params: &[SourceParam]) -> ToolDescriptor {
    let description = match source.description.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!("从外部数据源 \"{}\" 获取数据。", source.name),
    };

    params.iter().fold(
        ToolDescriptor::new(
            format!("{EXTERNAL_SOURCE_TOOL_PREFIX}{}", source.id),
            description,
        ),
        |tool, param| {
            let mut text = match param.description.as_deref() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => param.name.clone(),
            };
            if let Some(format) = param.format.as_deref().filter(|f| !f.is_empty()) {
                text.push_str(&format!(" (格式: {format})"));
            }
            tool.param(&param.name, param.param_type, text, param.required)
        },
    )
}

/// Source id encoded in a `callExternalSource_<id>` tool name.
pub fn source_id_from_tool_name(name: &str) -> Option<i64> {
    name.strip_prefix(EXTERNAL_SOURCE_TOOL_PREFIX)?.parse().ok()
}

/// Static tools first, then one tool per source of the project. Sources
/// whose rows cannot be read are left out.
pub fn synthesize_tools(db: &Database, project_id: &str) -> Vec<ToolDescriptor> {
    let mut tools = vec![search_tool(), team_cost_report_tool()];

    let sources = match db.list_sources(project_id) {
        Ok(sources) => sources,
        Err(err) => {
            warn!(project_id, error = %err, "Failed to list sources, offering static tools only");
            return tools;
        }
    };

    for source in &sources {
        match db.list_params(source.id) {
            Ok(params) => tools.push(external_source_tool(source, &params)),
            Err(err) => {
                warn!(source_id = source.id, error = %err, "Failed to read source params, omitting tool");
            }
        }
    }

    debug!(project_id, tools = tools.len(), "Synthesized tool set");
    tools
}
