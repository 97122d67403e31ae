// Configuration loading tests - server.toml files written to a temp dir.

use project_assistant::config::{AppConfig, ConfigError};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("server.toml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn shipped_config_file_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/server.toml");
    let config = AppConfig::load(Some(&path)).expect("shipped config");
    assert_eq!(config.server.bind, "0.0.0.0:3000".parse::<SocketAddr>().expect("addr"));
    assert_eq!(config.model.model, "gemini-3.1-pro-preview");
    assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
    assert!(config.report.endpoint.ends_with("/api/v1/report/cost/teams"));
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
[server]
bind = "127.0.0.1:8088"
cors_origins = ["http://localhost:5173"]

[report]
endpoint = "http://reports.local/cost"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config");
    assert_eq!(config.server.bind.port(), 8088);
    assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
    assert_eq!(config.report.endpoint, "http://reports.local/cost");
    assert_eq!(config.database.path, PathBuf::from("data.db"));
    assert_eq!(config.model.api_path, "v1beta/models");
}

#[test]
fn broken_toml_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server\nbind = ");
    let err = AppConfig::load(Some(&path)).expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn explicit_missing_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = AppConfig::load(Some(&path)).expect_err("missing file");
    assert!(matches!(err, ConfigError::NotFound { .. }));
}
