//! kvault - Knowledge Vault
//!
//! A tool gateway that exposes per-user knowledge graph operations to a calling
//! agent over MCP, normalizing remote results into a stable response envelope.

pub mod config;
pub mod error;
pub mod gateway;
pub mod graph;
pub mod mcp;
pub mod tools;

pub use error::{Result, VaultError};
