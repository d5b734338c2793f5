//! Knowledge graph tools backed by the gateway

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolDefinition, ToolOutput, string_arg, string_params_schema};
use crate::error::Result;
use crate::gateway::KnowledgeGateway;

/// Stores a user message in the knowledge graph
pub struct AddUserMessageTool {
    gateway: Arc<KnowledgeGateway>,
}

impl AddUserMessageTool {
    pub fn new(gateway: Arc<KnowledgeGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for AddUserMessageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "add_user_message",
            "Add user message to the knowledge graph. Returns the operation result \
             including success status and a preview of the stored data.",
        )
        .with_schema(string_params_schema(&[
            ("user_id", "User ID or email address"),
            ("message", "The user's message to store in the graph"),
        ]))
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput> {
        let response = self
            .gateway
            .add_user_message(string_arg(&arguments, "user_id"), string_arg(&arguments, "message"))
            .await?;
        ToolOutput::json(&response)
    }
}

/// Retrieves facts and entities relevant to a request
pub struct GetUserInformationTool {
    gateway: Arc<KnowledgeGateway>,
}

impl GetUserInformationTool {
    pub fn new(gateway: Arc<KnowledgeGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for GetUserInformationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_user_information",
            "Retrieve user knowledge and contextual information from the knowledge graph. \
             Searches a user's stored knowledge, conversations, preferences, and context for \
             content relevant to the request. Use it to recall past interactions, understand \
             user preferences, or find anything previously stored about the user.",
        )
        .with_schema(string_params_schema(&[
            ("user_id", "User ID or email address to search knowledge for"),
            (
                "request",
                "Natural language query describing the information needed \
                 (e.g. \"user preferences\", \"past conversations about travel\")",
            ),
        ]))
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput> {
        let response = self
            .gateway
            .get_user_information(string_arg(&arguments, "user_id"), string_arg(&arguments, "request"))
            .await?;
        ToolOutput::json(&response)
    }
}
