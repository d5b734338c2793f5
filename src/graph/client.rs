//! Remote knowledge graph client trait and error types

use async_trait::async_trait;
use serde_json::Value;

use super::types::{DataKind, SearchResults};

/// Client for a per-user knowledge graph service.
///
/// One handle is built at startup and shared by every handler, so
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Add data to the graph partition owned by `scope`.
    ///
    /// Returns the remote acknowledgement, or `None` when the service sent no body.
    async fn ingest(&self, scope: &str, kind: DataKind, payload: &str) -> Result<Option<Value>, GraphError>;

    /// Search the graph partition owned by `scope`, returning at most `limit` records
    async fn search(&self, query: &str, scope: &str, limit: usize) -> Result<SearchResults, GraphError>;
}

/// Errors that can occur talking to the knowledge graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

impl GraphError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GraphError::Api { status: 401 | 403, .. } | GraphError::MissingApiKey { .. })
    }
}
