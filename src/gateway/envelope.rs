//! Response envelopes returned by the knowledge tools
//!
//! Every envelope carries `success` and `message`. Failure envelopes carry `error`
//! and keep every collection field present but empty.

use serde::{Deserialize, Serialize};

use super::normalize::SearchSummary;

pub const INGEST_OK_MESSAGE: &str = "User message successfully added to knowledge graph";
pub const INGEST_FAILED_MESSAGE: &str = "Failed to add user message to knowledge graph";
pub const SEARCH_OK_MESSAGE: &str = "Information retrieved successfully";
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to retrieve information from knowledge graph";

/// Response of `add_user_message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestResponse {
    pub fn added(user_id: impl Into<String>, data_added: String, result: String) -> Self {
        Self {
            success: true,
            message: INGEST_OK_MESSAGE.to_string(),
            user_id: user_id.into(),
            data_added: Some(data_added),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(user_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: INGEST_FAILED_MESSAGE.to_string(),
            user_id: user_id.into(),
            data_added: None,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Response of `get_user_information`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    pub request: String,
    pub results: SearchSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn found(user_id: impl Into<String>, request: impl Into<String>, results: SearchSummary) -> Self {
        Self {
            success: true,
            message: SEARCH_OK_MESSAGE.to_string(),
            user_id: user_id.into(),
            request: request.into(),
            results,
            error: None,
        }
    }

    pub fn failed(user_id: impl Into<String>, request: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: SEARCH_FAILED_MESSAGE.to_string(),
            user_id: user_id.into(),
            request: request.into(),
            results: SearchSummary::empty(),
            error: Some(error.into()),
        }
    }
}
