pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{chat, tooling};
pub use cli::Cli;
pub use config::AppConfig;
pub use domain::types;
pub use infrastructure::{model, rpc, server, storage};

use application::tooling::{SourceExecutor, TeamCostReport};
use infrastructure::model::GeminiClient;
use infrastructure::server::ServerState;
use infrastructure::storage::Database;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting project-assistant");
    debug!(config = ?cli.config, addr = ?cli.addr, database = ?cli.database, "CLI arguments parsed");

    let config_path = cli.config.as_deref().map(Path::new);
    let mut app_config = AppConfig::load(config_path)?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration using default path or defaults");
    }
    if let Some(addr) = cli.addr {
        app_config.server.bind = addr;
    }
    if let Some(database) = cli.database {
        app_config.database.path = database;
    }

    let db = Arc::new(Database::open(&app_config.database.path)?);
    let api_key = app_config.model.resolve_api_key();
    debug!(model = %app_config.model.model, endpoint = %app_config.model.endpoint, "Creating Gemini provider");
    let provider = Arc::new(GeminiClient::from_config(&app_config.model, api_key));

    let http = reqwest::Client::new();
    let state = Arc::new(ServerState::new(
        provider,
        db,
        SourceExecutor::new(http.clone()),
        TeamCostReport::new(app_config.report.endpoint.clone(), http),
        app_config.model.model.clone(),
    ));

    server::serve(state, &app_config.server).await?;
    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
