pub mod chat;
pub mod tooling;
