//! Knowledge gateway handlers
//!
//! Each handler validates its arguments, issues exactly one remote call, and
//! converts the outcome into an envelope. Remote failures never escape as `Err`.

use std::sync::Arc;

use crate::error::{Result, VaultError};
use crate::graph::{DataKind, GraphClient, GraphError};

use super::envelope::{IngestResponse, SearchResponse};
use super::normalize::{normalize_results, render_ack, truncate_for_display};

/// Maximum records requested from a graph search
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Gateway between tool calls and the remote knowledge graph
#[derive(Clone)]
pub struct KnowledgeGateway {
    graph: Arc<dyn GraphClient>,
}

impl KnowledgeGateway {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    /// Store a user message in the user's graph partition
    pub async fn add_user_message(&self, user_id: &str, message: &str) -> Result<IngestResponse> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("message", message)?;

        tracing::debug!(user_id, len = message.len(), "ingesting message");

        match self.graph.ingest(user_id, DataKind::Text, message).await {
            Ok(ack) => Ok(IngestResponse::added(
                user_id,
                truncate_for_display(message),
                render_ack(ack.as_ref()),
            )),
            Err(e) => {
                log_remote_failure("add_user_message", user_id, &e);
                Ok(IngestResponse::failed(user_id, e.to_string()))
            }
        }
    }

    /// Search the user's graph partition and normalize facts and entities
    pub async fn get_user_information(&self, user_id: &str, request: &str) -> Result<SearchResponse> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("request", request)?;

        tracing::debug!(user_id, request, "searching graph");

        match self.graph.search(request, user_id, SEARCH_RESULT_LIMIT).await {
            Ok(results) => {
                let summary = normalize_results(&results);
                tracing::info!(
                    user_id,
                    facts = summary.total_facts,
                    entities = summary.total_entities,
                    "search complete"
                );
                Ok(SearchResponse::found(user_id, request, summary))
            }
            Err(e) => {
                log_remote_failure("get_user_information", user_id, &e);
                Ok(SearchResponse::failed(user_id, request, e.to_string()))
            }
        }
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::InvalidArgument(format!("{} must not be empty", name)));
    }
    Ok(())
}

fn log_remote_failure(tool: &str, user_id: &str, error: &GraphError) {
    if error.is_auth_failure() {
        tracing::error!(tool, user_id, error = %error, "graph rejected credentials");
    } else {
        tracing::warn!(tool, user_id, error = %error, "graph call failed");
    }
}
