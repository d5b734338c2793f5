//! Tool registry - holds the fixed tool set and dispatches calls by name

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::{
    AddUserMessageTool, EchoTool, GetStatusTool, GetUserInformationTool, HelloWorldTool, Tool, ToolCall,
    ToolDefinition, ToolOutput,
};
use crate::error::{Result, VaultError};
use crate::gateway::KnowledgeGateway;

/// Tools registered by `ToolRegistry::standard`, in listing order
pub const STANDARD_TOOL_NAMES: [&str; 5] = [
    "hello_world",
    "echo",
    "get_status",
    "add_user_message",
    "get_user_information",
];

struct Registered {
    definition: ToolDefinition,
    tool: Box<dyn Tool>,
}

/// Registry of tools, listed in registration order
pub struct ToolRegistry {
    tools: HashMap<String, Registered>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a registry with the standard tool set
    pub fn standard(gateway: Arc<KnowledgeGateway>, server_name: &str) -> Self {
        let names = STANDARD_TOOL_NAMES.iter().map(|name| name.to_string()).collect();

        let mut registry = Self::new();
        registry.register(Box::new(HelloWorldTool));
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(GetStatusTool::new(server_name, names)));
        registry.register(Box::new(AddUserMessageTool::new(gateway.clone())));
        registry.register(Box::new(GetUserInformationTool::new(gateway)));
        registry
    }

    /// Add a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let definition = tool.definition();
        let name = definition.name.clone();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, Registered { definition, tool });
    }

    /// Tool definitions for listing
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|entry| entry.definition.clone())
            .collect()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the list of tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Resolve a call to its tool, check its arguments, and execute it
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput> {
        let entry = self
            .tools
            .get(&call.name)
            .ok_or_else(|| VaultError::UnknownTool(call.name.clone()))?;

        entry.definition.check_arguments(&call.arguments)?;

        debug!("Dispatching tool call: {}", call.name);
        entry.tool.execute(call.arguments.clone()).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
