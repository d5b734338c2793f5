//! Error types for kvault
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::graph::GraphError;

/// All error types that can occur in kvault
#[derive(Debug, Error)]
pub enum VaultError {
    /// Caller named a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Missing, empty, or mistyped argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by the remote knowledge graph
    #[error("Remote failure: {0}")]
    Remote(#[from] GraphError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// Whether the error should surface as a protocol-level invalid-params error
    pub fn is_caller_error(&self) -> bool {
        matches!(self, VaultError::UnknownTool(_) | VaultError::InvalidArgument(_))
    }
}

/// Result type alias for kvault operations
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_error() {
        let err = VaultError::UnknownTool("delete_everything".to_string());
        assert_eq!(err.to_string(), "Unknown tool: delete_everything");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = VaultError::InvalidArgument("user_id must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid argument: user_id must not be empty");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_remote_error_conversion() {
        let err: VaultError = GraphError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        }
        .into();
        assert!(matches!(err, VaultError::Remote(_)));
        assert!(err.to_string().contains("401"));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_config_error() {
        let err = VaultError::Config("ZEP_API_KEY not set".to_string());
        assert_eq!(err.to_string(), "Config error: ZEP_API_KEY not set");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: VaultError = io_err.into();
        assert!(matches!(err, VaultError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: VaultError = json_err.into();
        assert!(matches!(err, VaultError::Json(_)));
    }
}
