//! Application constants
//!
//! Single source of truth for paths, tool names and user-facing text.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/server.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Internal keyword search over a project's data entries.
pub const SEARCH_TOOL: &str = "searchProjectData";

/// Fixed server-side reporting integration.
pub const TEAM_COST_REPORT_TOOL: &str = "get_team_cost_report";

/// Prefix of the per-source tools; the suffix is the source id.
pub const EXTERNAL_SOURCE_TOOL_PREFIX: &str = "callExternalSource_";

/// Returned instead of an error when the model provider reports quota exhaustion.
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "抱歉，当前 API 配额已耗尽。请点击页面上方的“选择 API Key”按钮，配置您自己的付费 API Key 以继续使用。";

/// Name and version announced by the MCP bridge.
pub const MCP_SERVER_NAME: &str = "Internal Report Server";
pub const MCP_SERVER_VERSION: &str = "1.0.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
