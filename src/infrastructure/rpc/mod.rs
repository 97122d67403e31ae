pub mod mcp;
pub mod types;

pub use mcp::{SessionGuard, SessionRegistry, handle_mcp_request};
pub use types::{RpcError, RpcRequest, RpcResponse};
