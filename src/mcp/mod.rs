//! MCP transport - JSON-RPC message types and the stdio server loop

pub mod messages;
pub mod server;

pub use messages::{ErrorCode, JSONRPC_VERSION, RpcError, RpcRequest, RpcResponse};
pub use server::{DEFAULT_PROTOCOL_VERSION, McpServer, ServerInfo, call_result};
