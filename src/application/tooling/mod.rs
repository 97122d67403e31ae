//! Tools the assistant can offer to the model, and the machinery that runs
//! them: per-source tool synthesis, HTTP request building and execution,
//! the internal keyword search and the team cost report integration.

mod error;
mod executor;
mod report;
mod request;
mod search;
mod synthesizer;

pub use error::SourceError;
pub use executor::{ExecutionOutcome, FailureHint, SourceExecutor, classify_failure};
pub use report::{ReportQuery, TeamCostReport, ToolCallResult, ToolContent};
pub use request::{RequestDescriptor, parse_json_object, param_string};
pub use search::search_project_data;
pub use synthesizer::{
    external_source_tool, search_tool, source_id_from_tool_name, synthesize_tools,
    team_cost_report_tool,
};
