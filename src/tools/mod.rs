//! Tool System - tool definitions, handlers, and the registry that dispatches to them
//!
//! Tools are the named operations the calling agent can invoke. The registry holds a
//! fixed set of them and routes each call by name.

mod definition;
mod knowledge;
mod registry;
mod status;

pub use definition::{ToolDefinition, string_params_schema};
pub use knowledge::{AddUserMessageTool, GetUserInformationTool};
pub use registry::{STANDARD_TOOL_NAMES, ToolRegistry};
pub use status::{EchoTool, GetStatusTool, HelloWorldTool};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A tool that can be called by the agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool metadata: name, description, input schema
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool. Arguments have already been checked against the schema.
    async fn execute(&self, arguments: Value) -> Result<ToolOutput>;
}

/// Output of a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

impl ToolOutput {
    /// Serialize a response envelope into JSON output
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Output as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutput::Text(text) => Value::String(text.clone()),
            ToolOutput::Json(value) => value.clone(),
        }
    }
}

/// A call to a named tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Fetch a string argument the schema check has already vouched for
pub(crate) fn string_arg<'a>(arguments: &'a Value, name: &str) -> &'a str {
    arguments[name].as_str().unwrap_or_default()
}
