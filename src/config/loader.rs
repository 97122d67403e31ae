use super::AppConfig;
use super::app::{DatabaseConfig, ModelConfig, ReportConfig, ServerSettings, default_bind};
use super::error::ConfigError;
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub database: RawDatabase,
    #[serde(default)]
    pub model: RawModel,
    #[serde(default)]
    pub report: RawReport,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawServer {
    pub bind: Option<String>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawDatabase {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawModel {
    pub endpoint: Option<String>,
    pub api_path: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawReport {
    pub endpoint: Option<String>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist; when no path is given and the default file
/// is absent, built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                debug!(path = CONFIG_PATH, "No configuration file found, using defaults");
                validate_and_build(RawConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading server configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

pub(super) fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let bind_raw = parsed
        .server
        .bind
        .unwrap_or_else(|| default_bind().to_string());
    let bind = bind_raw
        .parse()
        .map_err(|source| ConfigError::InvalidBind {
            value: bind_raw.clone(),
            source,
        })?;

    let database_path = parsed
        .database
        .path
        .map(|raw| PathBuf::from(shellexpand::tilde(&raw).into_owned()))
        .unwrap_or(defaults.database.path);

    let model = ModelConfig {
        endpoint: parsed.model.endpoint.unwrap_or(defaults.model.endpoint),
        api_path: parsed.model.api_path.unwrap_or(defaults.model.api_path),
        model: parsed.model.model.unwrap_or(defaults.model.model),
        api_key_env: parsed
            .model
            .api_key_env
            .unwrap_or(defaults.model.api_key_env),
    };

    Ok(AppConfig {
        server: ServerSettings {
            bind,
            cors_origins: parsed.server.cors_origins,
            static_dir: parsed
                .server
                .static_dir
                .map(|raw| PathBuf::from(shellexpand::tilde(&raw).into_owned())),
        },
        database: DatabaseConfig {
            path: database_path,
        },
        model,
        report: ReportConfig {
            endpoint: parsed.report.endpoint.unwrap_or(defaults.report.endpoint),
        },
    })
}
