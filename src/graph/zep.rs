//! Zep Cloud graph client
//!
//! Implements GraphClient over the Zep v2 REST API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};

use super::client::{GraphClient, GraphError};
use super::types::{DataKind, SearchResults};

/// Zep API base URL
pub const ZEP_API_URL: &str = "https://api.getzep.com/api/v2";

/// Environment variable holding the API key
pub const ZEP_API_KEY_ENV: &str = "ZEP_API_KEY";

/// Configuration for the Zep client
#[derive(Debug, Clone)]
pub struct ZepConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ZepConfig {
    fn default() -> Self {
        Self {
            base_url: ZEP_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Zep Cloud API client
pub struct ZepClient {
    client: Client,
    api_key: String,
    config: ZepConfig,
}

impl ZepClient {
    /// Create a client reading the API key from `env_var`
    pub fn from_env(env_var: &str, config: ZepConfig) -> Result<Self, GraphError> {
        let api_key = std::env::var(env_var).map_err(|_| GraphError::MissingApiKey {
            env_var: env_var.to_string(),
        })?;

        if api_key.trim().is_empty() {
            return Err(GraphError::MissingApiKey {
                env_var: env_var.to_string(),
            });
        }

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: ZepConfig) -> Result<Self, GraphError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn build_ingest_body(scope: &str, kind: DataKind, payload: &str) -> Value {
        json!({
            "user_id": scope,
            "type": kind.as_str(),
            "data": payload
        })
    }

    fn build_search_body(query: &str, scope: &str, limit: usize) -> Value {
        json!({
            "query": query,
            "user_id": scope,
            "limit": limit
        })
    }

    /// Decode a response body. Empty bodies decode to `None`.
    fn parse_body(body: &str) -> Result<Option<Value>, GraphError> {
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| GraphError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    fn parse_search(body: Option<Value>) -> Result<SearchResults, GraphError> {
        match body {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| GraphError::InvalidResponse(format!("Unexpected search result shape: {}", e))),
            None => Ok(SearchResults::default()),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>, GraphError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            };
            return Err(GraphError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Self::parse_body(&text)
    }
}

#[async_trait]
impl GraphClient for ZepClient {
    async fn ingest(&self, scope: &str, kind: DataKind, payload: &str) -> Result<Option<Value>, GraphError> {
        let body = Self::build_ingest_body(scope, kind, payload);
        self.post("graph", &body).await
    }

    async fn search(&self, query: &str, scope: &str, limit: usize) -> Result<SearchResults, GraphError> {
        let body = Self::build_search_body(query, scope, limit);
        let response = self.post("graph/search", &body).await?;
        Self::parse_search(response)
    }
}

impl std::fmt::Debug for ZepClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZepClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{DEFAULT_ACK, render_ack};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Client for a loopback server; proxy settings from the environment are ignored
    fn local_client(base_url: &str) -> ZepClient {
        ZepClient {
            client: Client::builder().no_proxy().build().unwrap(),
            api_key: "test-key".to_string(),
            config: ZepConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            },
        }
    }

    /// Accept one connection, read the full request, answer with `response`.
    /// The handle yields the raw request text.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api/v2", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + body_len {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn test_client(base_url: &str) -> ZepClient {
        ZepClient::with_api_key(
            "test-key",
            ZepConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ZepConfig::default();
        assert_eq!(config.base_url, ZEP_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_joins_path() {
        let client = test_client("https://example.test/api/v2/");
        assert_eq!(client.endpoint("graph/search"), "https://example.test/api/v2/graph/search");
    }

    #[test]
    fn test_ingest_body() {
        let body = ZepClient::build_ingest_body("u1", DataKind::Text, "hello");
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["type"], "text");
        assert_eq!(body["data"], "hello");
    }

    #[test]
    fn test_search_body() {
        let body = ZepClient::build_search_body("preferences", "u1", 10);
        assert_eq!(body["query"], "preferences");
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["limit"], 10);
    }

    #[test]
    fn test_parse_body_empty() {
        assert!(ZepClient::parse_body("").unwrap().is_none());
        assert!(ZepClient::parse_body("  \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_body_invalid() {
        let err = ZepClient::parse_body("<html>").unwrap_err();
        assert!(matches!(err, GraphError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_search_full() {
        let body = ZepClient::parse_body(
            r#"{"edges":[{"uuid":"e1","fact":"Alice likes tea"}],"nodes":[{"name":"Alice"}],"episodes":null}"#,
        )
        .unwrap();
        let results = ZepClient::parse_search(body).unwrap();
        assert_eq!(results.edges.unwrap().len(), 1);
        assert_eq!(results.nodes.unwrap()[0].name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_parse_search_empty_body() {
        let results = ZepClient::parse_search(None).unwrap();
        assert_eq!(results, SearchResults::default());
    }

    #[test]
    fn test_parse_search_wrong_shape() {
        let err = ZepClient::parse_search(Some(serde_json::json!({"edges": "nope"}))).unwrap_err();
        assert!(matches!(err, GraphError::InvalidResponse(_)));
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = ZepClient::from_env("KVAULT_TEST_UNSET_KEY_VAR", ZepConfig::default()).unwrap_err();
        assert!(matches!(err, GraphError::MissingApiKey { .. }));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = test_client(ZEP_API_URL);
        let debug = format!("{:?}", client);
        assert!(debug.contains("ZepClient"));
        assert!(!debug.contains("test-key"));
    }

    #[tokio::test]
    async fn test_network_failure_is_error() {
        // Port 9 on localhost is not listening in test environments
        let client = test_client("http://127.0.0.1:9/api/v2");
        let result = client.search("q", "u1", 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unauthorized_with_empty_body_uses_reason() {
        let (base_url, server) =
            serve_once("HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let client = local_client(&base_url);

        let err = client.search("q", "u1", 10).await.unwrap_err();

        match &err {
            GraphError::Api { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_auth_failure());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v2/graph/search "));
        assert!(request.to_lowercase().contains("authorization: api-key test-key"));
    }

    #[tokio::test]
    async fn test_server_error_body_is_the_message() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 13\r\nConnection: close\r\n\r\ngraph is down",
        )
        .await;
        let client = local_client(&base_url);

        let err = client.ingest("u1", DataKind::Text, "hello").await.unwrap_err();

        match &err {
            GraphError::Api { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "graph is down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!err.is_auth_failure());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_ingest_empty_success_body_is_no_ack() {
        let (base_url, server) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let client = local_client(&base_url);

        let ack = client.ingest("u1", DataKind::Text, "hello").await.unwrap();

        assert!(ack.is_none());
        assert_eq!(render_ack(ack.as_ref()), DEFAULT_ACK);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v2/graph "));
        assert!(request.contains(r#""user_id":"u1""#));
        assert!(request.contains(r#""type":"text""#));
    }

    #[tokio::test]
    async fn test_search_success_body_is_parsed() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 39\r\nConnection: close\r\n\r\n{\"edges\":[{\"fact\":\"tea\"}],\"nodes\":null}",
        )
        .await;
        let client = local_client(&base_url);

        let results = client.search("drinks", "u1", 10).await.unwrap();

        assert_eq!(results.edges.unwrap()[0].fact.as_deref(), Some("tea"));
        assert!(results.nodes.is_none());
        server.await.unwrap();
    }
}
