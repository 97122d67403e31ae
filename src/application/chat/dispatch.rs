use super::models::ToolOutput;
use crate::application::tooling::{
    ExecutionOutcome, FailureHint, ReportQuery, RequestDescriptor, SourceExecutor, TeamCostReport,
    param_string, search_project_data, source_id_from_tool_name,
};
use crate::constants::{SEARCH_TOOL, TEAM_COST_REPORT_TOOL};
use crate::infrastructure::storage::Database;
use crate::types::FunctionCall;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the tool calls a model requested against the project's data.
#[derive(Clone)]
pub struct ToolDispatcher {
    db: Arc<Database>,
    executor: SourceExecutor,
    reports: TeamCostReport,
}

impl ToolDispatcher {
    pub fn new(db: Arc<Database>, executor: SourceExecutor, reports: TeamCostReport) -> Self {
        Self {
            db,
            executor,
            reports,
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// `None` when the call names no known tool or an unknown source; such
    /// calls leave no trace in the results.
    pub async fn dispatch(&self, project_id: &str, call: &FunctionCall) -> Option<ToolOutput> {
        info!(tool = %call.name, project_id, "Dispatching tool call");
        let content = match call.name.as_str() {
            SEARCH_TOOL => self.search(project_id, call).await,
            TEAM_COST_REPORT_TOOL => {
                let query = ReportQuery::from_args(&call.args);
                self.reports.fetch(&query).await.joined_text()
            }
            name => match source_id_from_tool_name(name) {
                Some(source_id) => self.call_source(project_id, source_id, call).await?,
                None => {
                    warn!(tool = %name, "Model requested an unknown tool");
                    return None;
                }
            },
        };
        Some(ToolOutput {
            name: call.name.clone(),
            content,
        })
    }

    async fn search(&self, project_id: &str, call: &FunctionCall) -> String {
        let target = call.str_arg("projectId").unwrap_or(project_id).to_string();
        let query = call.args.get("query").map(param_string).unwrap_or_default();
        let searched = self
            .db
            .blocking({
                let target = target.clone();
                move |db| search_project_data(db, &target, &query)
            })
            .await;
        match searched {
            Ok(hits) => serde_json::to_string(&hits).unwrap_or_else(|err| failure(&err.to_string())),
            Err(err) => {
                warn!(project_id = %target, error = %err, "Search tool failed");
                failure(&err.to_string())
            }
        }
    }

    async fn call_source(
        &self,
        project_id: &str,
        source_id: i64,
        call: &FunctionCall,
    ) -> Option<String> {
        let source = match self.db.blocking(move |db| db.source(source_id)).await {
            Ok(Some(source)) if source.project_id == project_id => source,
            Ok(_) => {
                warn!(source_id, project_id, "Tool call names a source outside the project");
                return None;
            }
            Err(err) => {
                warn!(source_id, error = %err, "Failed to load source");
                return Some(failure(&err.to_string()));
            }
        };

        let request = match RequestDescriptor::for_source(&source, &call.args) {
            Ok(request) => request,
            Err(err) => {
                warn!(source_id, error = %err, "Stored source configuration is invalid");
                return Some(failure(&err.to_string()));
            }
        };

        let outcome = self
            .executor
            .execute(&request, FailureHint::PublicReachability)
            .await;
        Some(outcome_content(&outcome))
    }
}

fn outcome_content(outcome: &ExecutionOutcome) -> String {
    match &outcome.error {
        Some(error) if !outcome.success => failure(error),
        _ => outcome.body_text(),
    }
}

fn failure(message: &str) -> String {
    format!("执行失败: {message}")
}
