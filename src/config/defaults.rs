pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE_PATH: &str = "data.db";
pub const DEFAULT_MODEL: &str = "gemini-3.1-pro-preview";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_REPORT_ENDPOINT: &str =
    "https://concussant-hollie-unwestern.ngrok-free.dev/api/v1/report/cost/teams";
