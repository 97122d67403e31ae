use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "project-assistant",
    version,
    about = "Project data assistant with external-source tools for LLM chat"
)]
pub struct Cli {
    /// Configuration file (defaults to config/server.toml when present)
    #[arg(long)]
    pub config: Option<String>,
    /// Listen address, overriding `[server] bind`
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// SQLite database file, overriding `[database] path`
    #[arg(long)]
    pub database: Option<PathBuf>,
}
