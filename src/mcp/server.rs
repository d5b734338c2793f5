//! MCP server - newline-delimited JSON-RPC over stdio
//!
//! Provides:
//! - Request routing for initialize, ping, tools/list, tools/call
//! - Mapping of dispatcher errors to protocol errors
//! - The read/dispatch/write loop over any async reader and writer

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{Result, VaultError};
use crate::mcp::messages::{RpcError, RpcRequest, RpcResponse};
use crate::tools::{ToolCall, ToolOutput, ToolRegistry};

/// Protocol version offered when the client does not ask for one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity reported in the initialize handshake
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "Knowledge Vault".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
        }
    }
}

/// MCP server over a tool registry
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn run_stdio(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve requests read line by line from `reader`, writing replies to `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server '{}' ready", self.info.name);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim()).await,
                Err(e) => {
                    warn!("Line is not valid UTF-8: {}", e);
                    Some(RpcResponse::error(Value::Null, RpcError::parse_error(e.to_string())))
                }
            };

            if let Some(response) = response {
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                writer.write_all(&payload).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("JSON parse error: {}", e);
                return Some(RpcResponse::error(Value::Null, RpcError::parse_error(e.to_string())));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(RpcResponse::error(id, RpcError::invalid_request(e.to_string()))),
        }
    }

    /// Route a parsed request
    pub async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        debug!("Received: {}", request.method);

        if request.is_notification() {
            debug!("Notification '{}' needs no reply", request.method);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize_result(&request.params)),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => RpcResponse::success(id, json!({ "tools": self.registry.definitions() })),
            "tools/call" => match self.call_tool(request.params).await {
                Ok(result) => RpcResponse::success(id, result),
                Err(error) => RpcResponse::error(id, error),
            },
            other => RpcResponse::error(id, RpcError::method_not_found(other)),
        };

        Some(response)
    }

    fn initialize_result(&self, params: &Value) -> Value {
        let protocol = params["protocolVersion"]
            .as_str()
            .unwrap_or(&self.info.protocol_version);

        json!({
            "protocolVersion": protocol,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version,
            }
        })
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, RpcError> {
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| RpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        info!("CALL {}", call.name);

        match self.registry.dispatch(&call).await {
            Ok(output) => Ok(call_result(output)),
            Err(e) => {
                warn!("Tool '{}' rejected: {}", call.name, e);
                Err(rpc_error_for(&e))
            }
        }
    }
}

/// Wrap tool output in an MCP call result
pub fn call_result(output: ToolOutput) -> Value {
    match output {
        ToolOutput::Text(text) => json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false
        }),
        ToolOutput::Json(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            json!({
                "content": [{ "type": "text", "text": text }],
                "structuredContent": value,
                "isError": false
            })
        }
    }
}

fn rpc_error_for(error: &VaultError) -> RpcError {
    if error.is_caller_error() {
        RpcError::invalid_params(error.to_string())
    } else {
        RpcError::internal_error(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::KnowledgeGateway;
    use crate::graph::MockGraphClient;
    use crate::mcp::messages::ErrorCode;

    fn test_server() -> McpServer {
        let gateway = Arc::new(KnowledgeGateway::new(Arc::new(MockGraphClient::new())));
        let registry = Arc::new(ToolRegistry::standard(gateway, "Knowledge Vault"));
        McpServer::new(registry, ServerInfo::default())
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "Knowledge Vault");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_initialize_default_protocol_version() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let server = test_server();
        let resp = server.handle_line("{not json").await.unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, ErrorCode::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_request_keeps_id() {
        let server = test_server();
        let resp = server.handle_line(r#"{"id":4,"params":{}}"#).await.unwrap();
        assert_eq!(resp.id, json!(4));
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ping() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 5);
        assert_eq!(tools[0]["name"], "hello_world");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_text_output() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"hello_world","arguments":{}}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "hello world");
        assert_eq!(result["isError"], false);
        assert!(result.get("structuredContent").is_none());
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"drop_tables"}}"#)
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert!(error.message.contains("Unknown tool: drop_tables"));
    }

    #[tokio::test]
    async fn test_tools_call_missing_name() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_call_result_json_output() {
        let result = call_result(ToolOutput::Json(json!({"success": true})));
        assert_eq!(result["structuredContent"]["success"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["success"], true);
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_reply() {
        let server = test_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output: Vec<u8> = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8_line() {
        let server = test_server();
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.push(b'\n');
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"message":""#);
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(br#""}}}"#);
        input.push(b'\n');
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#);
        input.push(b'\n');
        let mut output: Vec<u8> = Vec::new();

        server.serve(&input[..], &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], Value::Null);
        assert_eq!(replies[1]["error"]["code"], ErrorCode::PARSE_ERROR);
        assert_eq!(replies[2]["id"], 3);
        assert_eq!(replies[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_serve_last_line_without_newline() {
        let server = test_server();
        let input = r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#;
        let mut output: Vec<u8> = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let reply: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(reply["id"], 9);
    }

    #[tokio::test]
    async fn test_null_id_gets_a_reply() {
        let server = test_server();
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.result, Some(json!({})));
    }
}
