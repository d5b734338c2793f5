//! Wire types for the remote knowledge graph
//!
//! Every field the remote may omit is an `Option`; unknown fields are ignored.
//! Normalization into caller-facing records happens in `crate::gateway`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content-type tag attached to ingested data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    #[default]
    Text,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Text => "text",
        }
    }
}

/// A relationship record ("edge") returned by a graph search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityEdge {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub fact: Option<String>,
    pub created_at: Option<Value>,
    pub source_node_uuid: Option<String>,
    pub target_node_uuid: Option<String>,
}

impl EntityEdge {
    /// Edge carrying only fact text
    pub fn with_fact(fact: impl Into<String>) -> Self {
        Self {
            fact: Some(fact.into()),
            ..Default::default()
        }
    }
}

/// An entity record ("node") returned by a graph search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityNode {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<Value>,
    pub labels: Option<Vec<String>>,
}

impl EntityNode {
    /// Node carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Raw result of a graph search. Either collection may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub edges: Option<Vec<EntityEdge>>,
    pub nodes: Option<Vec<EntityNode>>,
}

impl SearchResults {
    pub fn new(edges: Vec<EntityEdge>, nodes: Vec<EntityNode>) -> Self {
        Self {
            edges: Some(edges),
            nodes: Some(nodes),
        }
    }
}
