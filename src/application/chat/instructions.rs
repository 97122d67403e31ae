use super::models::ToolOutput;
use crate::constants::SEARCH_TOOL;
use crate::domain::tool::ToolDescriptor;

pub(super) fn system_instruction(
    project_id: &str,
    project_name: &str,
    tools: &[ToolDescriptor],
) -> String {
    let listing = tools
        .iter()
        .enumerate()
        .map(|(index, tool)| format!("{}. '{}': {}", index + 1, tool.name, tool.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "你是一个关于项目 \"{project_name}\" (ID: {project_id}) 的专家助手。\n\
         你的目标是通过从项目的内部数据库或外部 API 中检索数据，准确回答用户的问题。\n\
         \n\
         可用工具：\n\
         {listing}\n\
         \n\
         在回答之前，请务必使用最合适的工具查找相关信息。\n\
         查询项目内部已有的静态数据点时，请优先使用 '{SEARCH_TOOL}'。\n\
         如果用户询问特定时间段的数据，请优先使用支持时间参数的外部数据源工具。\n\
         汇总检索到的数据，提供简洁且有帮助的回答。"
    )
}

/// Follow-up message carrying every tool result of the dispatch round.
pub(super) fn results_message(results: &[ToolOutput]) -> String {
    let data = results
        .iter()
        .map(|result| format!("{} 返回的数据: {}", result.name, result.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("系统找到的数据:\n{data}\n\n请根据这些数据汇总并回答原始问题。")
}
