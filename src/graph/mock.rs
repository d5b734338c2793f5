//! Recording mock graph client for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::client::{GraphClient, GraphError};
use super::types::{DataKind, SearchResults};

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Ingest {
        scope: String,
        kind: DataKind,
        payload: String,
    },
    Search {
        query: String,
        scope: String,
        limit: usize,
    },
}

/// Mock graph client that records calls and returns canned results
pub struct MockGraphClient {
    ack: Option<Value>,
    results: SearchResults,
    failures: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGraphClient {
    pub fn new() -> Self {
        Self {
            ack: Some(serde_json::json!({"uuid": "episode-1", "processed": false})),
            results: SearchResults::default(),
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Acknowledgement returned from ingest
    pub fn with_ack(mut self, ack: Option<Value>) -> Self {
        self.ack = ack;
        self
    }

    /// Results returned from search
    pub fn with_results(mut self, results: SearchResults) -> Self {
        self.results = results;
        self
    }

    /// Make the next call fail with a 503 carrying `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(message.into());
    }

    /// All calls received, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: RecordedCall) -> Result<(), GraphError> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);

        match self.failures.lock().unwrap_or_else(|e| e.into_inner()).pop_front() {
            Some(message) => Err(GraphError::Api { status: 503, message }),
            None => Ok(()),
        }
    }
}

impl Default for MockGraphClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphClient for MockGraphClient {
    async fn ingest(&self, scope: &str, kind: DataKind, payload: &str) -> Result<Option<Value>, GraphError> {
        self.record(RecordedCall::Ingest {
            scope: scope.to_string(),
            kind,
            payload: payload.to_string(),
        })?;
        Ok(self.ack.clone())
    }

    async fn search(&self, query: &str, scope: &str, limit: usize) -> Result<SearchResults, GraphError> {
        self.record(RecordedCall::Search {
            query: query.to_string(),
            scope: scope.to_string(),
            limit,
        })?;
        Ok(self.results.clone())
    }
}
