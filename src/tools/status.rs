//! Status and introspection tools: hello_world, echo, get_status

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Tool, ToolDefinition, ToolOutput, string_arg, string_params_schema};
use crate::error::Result;

/// Returns a fixed greeting
pub struct HelloWorldTool;

#[async_trait]
impl Tool for HelloWorldTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("hello_world", "Returns a simple hello world message")
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolOutput> {
        Ok(ToolOutput::Text("hello world".to_string()))
    }
}

/// Echoes a message back with a greeting prefix
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("echo", "Echo back a message with hello world prefix")
            .with_schema(string_params_schema(&[("message", "Message to echo back")]))
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput> {
        let message = string_arg(&arguments, "message");
        Ok(ToolOutput::Text(format!("hello world: {}", message)))
    }
}

/// Reports server status and the registered tool names
pub struct GetStatusTool {
    server_name: String,
    tool_names: Vec<String>,
}

impl GetStatusTool {
    pub fn new(server_name: impl Into<String>, tool_names: Vec<String>) -> Self {
        Self {
            server_name: server_name.into(),
            tool_names,
        }
    }
}

#[async_trait]
impl Tool for GetStatusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_status", "Get server status information")
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolOutput> {
        Ok(ToolOutput::Json(json!({
            "status": "running",
            "message": "hello world",
            "server": self.server_name,
            "available_tools": self.tool_names,
        })))
    }
}
