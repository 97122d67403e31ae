//! HTTP surface: project/data/source CRUD, source execution, search, chat,
//! and the MCP event-stream bridge.

mod docs;
mod dto;
mod error;
mod routes;
mod state;

pub use docs::ApiDoc;
pub use error::{ApiError, ServerError};
pub use state::ServerState;

use crate::config::ServerSettings;
use crate::infrastructure::model::ModelProvider;
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use routes::{chat, data, mcp, params, projects, search, sources};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};
use utoipa::OpenApi;

/// Build the application router. Exposed separately from [`serve`] so tests
/// can drive it on an ephemeral port.
pub fn router<P>(state: Arc<ServerState<P>>, settings: &ServerSettings) -> Router
where
    P: ModelProvider + 'static,
{
    let api = ApiDoc::openapi();

    let app = Router::new()
        .route(
            "/api-doc/openapi.json",
            get(move || {
                let api = api.clone();
                async move { Json(api) }
            }),
        )
        .route(
            "/api/projects",
            get(projects::list_projects::<P>).post(projects::create_project::<P>),
        )
        .route("/api/projects/{id}", delete(projects::delete_project::<P>))
        .route(
            "/api/projects/{id}/data",
            get(data::list_entries::<P>).post(data::add_entry::<P>),
        )
        .route("/api/data/{id}", delete(data::delete_entry::<P>))
        .route(
            "/api/projects/{id}/sources",
            get(sources::list_sources::<P>).post(sources::create_source::<P>),
        )
        .route(
            "/api/sources/{id}",
            put(sources::update_source::<P>).delete(sources::delete_source::<P>),
        )
        .route("/api/sources/{id}/fetch", post(sources::fetch_source::<P>))
        .route("/api/sources/test", post(sources::test_source::<P>))
        .route(
            "/api/sources/execute/{id}",
            post(sources::execute_source::<P>),
        )
        .route(
            "/api/sources/{id}/params",
            get(params::list_params::<P>).post(params::create_param::<P>),
        )
        .route("/api/params/{id}", delete(params::delete_param::<P>))
        .route("/api/ai/search", get(search::search::<P>))
        .route("/api/projects/{id}/chat", post(chat::project_chat::<P>))
        .route("/api/mcp/call", post(mcp::mcp_call::<P>))
        .route("/sse", get(mcp::sse::<P>))
        .route("/messages", post(mcp::messages::<P>))
        .layer(cors_layer(&settings.cors_origins))
        .with_state(state);

    match &settings.static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static assets");
            let index = ServeFile::new(dir.join("index.html"));
            app.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Bind and serve until Ctrl-C.
pub async fn serve<P>(state: Arc<ServerState<P>>, settings: &ServerSettings) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    let addr = settings.bind;
    info!(%addr, "Binding HTTP server");
    let app = router(state, settings);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "Server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
