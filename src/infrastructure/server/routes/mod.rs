pub mod chat;
pub mod data;
pub mod mcp;
pub mod params;
pub mod projects;
pub mod search;
pub mod sources;
