use super::defaults::{
    DEFAULT_API_KEY_ENV, DEFAULT_BIND, DEFAULT_DATABASE_PATH, DEFAULT_GEMINI_ENDPOINT,
    DEFAULT_MODEL, DEFAULT_REPORT_ENDPOINT,
};
use super::error::ConfigError;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Application configuration loaded from server.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// Empty means any origin is accepted.
    pub cors_origins: Vec<String>,
    /// Built front-end assets, served for every path the API does not claim.
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub endpoint: String,
    pub api_path: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub endpoint: String,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            database: DatabaseConfig {
                path: PathBuf::from(DEFAULT_DATABASE_PATH),
            },
            model: ModelConfig::default(),
            report: ReportConfig {
                endpoint: DEFAULT_REPORT_ENDPOINT.to_string(),
            },
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_origins: Vec::new(),
            static_dir: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_path: DEFAULT_GEMINI_API_PATH.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl ModelConfig {
    /// Resolve the API key from the environment.
    ///
    /// A missing variable yields an empty key: requests still go out and are
    /// rejected by the provider.
    pub fn resolve_api_key(&self) -> String {
        match env::var(&self.api_key_env) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    env_var = self.api_key_env.as_str(),
                    %err,
                    "API key environment variable is not set; model calls will be rejected"
                );
                String::new()
            }
        }
    }
}

pub(super) fn default_bind() -> &'static str {
    DEFAULT_BIND
}
