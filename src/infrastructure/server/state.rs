use crate::application::chat::{ProjectAssistant, ToolDispatcher};
use crate::application::tooling::{SourceExecutor, TeamCostReport};
use crate::infrastructure::model::ModelProvider;
use crate::infrastructure::rpc::SessionRegistry;
use crate::infrastructure::storage::Database;
use std::sync::Arc;

pub struct ServerState<P: ModelProvider> {
    assistant: ProjectAssistant<P>,
    db: Arc<Database>,
    executor: SourceExecutor,
    reports: TeamCostReport,
    sessions: SessionRegistry,
}

impl<P: ModelProvider> ServerState<P> {
    pub fn new(
        provider: Arc<P>,
        db: Arc<Database>,
        executor: SourceExecutor,
        reports: TeamCostReport,
        model: impl Into<String>,
    ) -> Self {
        let dispatcher = ToolDispatcher::new(Arc::clone(&db), executor.clone(), reports.clone());
        Self {
            assistant: ProjectAssistant::new(provider, dispatcher, model),
            db,
            executor,
            reports,
            sessions: SessionRegistry::new(),
        }
    }

    pub(crate) fn assistant(&self) -> &ProjectAssistant<P> {
        &self.assistant
    }

    pub(crate) fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub(crate) fn executor(&self) -> &SourceExecutor {
        &self.executor
    }

    pub(crate) fn reports(&self) -> &TeamCostReport {
        &self.reports
    }

    pub(crate) fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
