// Shared harness: an in-memory database behind the real router on an
// ephemeral port, with a scripted model provider.

#![allow(dead_code)]

use async_trait::async_trait;
use project_assistant::config::ServerSettings;
use project_assistant::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use project_assistant::server::{self, ServerState};
use project_assistant::storage::Database;
use project_assistant::tooling::{SourceExecutor, TeamCostReport};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<ModelResponse>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.recordings.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| ModelError::invalid_response("scripted", "script exhausted"))
    }
}

pub struct TestApp {
    pub base: String,
    pub db: Arc<Database>,
    pub provider: ScriptedProvider,
    pub http: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

pub async fn spawn_app(provider: ScriptedProvider, report_endpoint: &str) -> TestApp {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let state = Arc::new(ServerState::new(
        Arc::new(provider.clone()),
        Arc::clone(&db),
        SourceExecutor::default(),
        TeamCostReport::new(report_endpoint, reqwest::Client::new()),
        "gemini-test",
    ));
    let app = server::router(state, &ServerSettings::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("server");
    });

    TestApp {
        base: format!("http://{addr}"),
        db,
        provider,
        http: reqwest::Client::new(),
    }
}

/// A local port with nothing listening on it.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    addr
}
