//! Remote knowledge graph layer
//!
//! This module provides:
//! - GraphClient trait for the remote service
//! - ZepClient implementation over HTTP
//! - Wire types for search results
//! - MockGraphClient for tests

pub mod client;
pub mod mock;
pub mod types;
pub mod zep;

pub use client::{GraphClient, GraphError};
pub use mock::{MockGraphClient, RecordedCall};
pub use types::{DataKind, EntityEdge, EntityNode, SearchResults};
pub use zep::{ZEP_API_KEY_ENV, ZEP_API_URL, ZepClient, ZepConfig};
