//! Normalization of remote graph records into caller-facing facts and entities
//!
//! Every defaulting rule lives here:
//! - edges without fact text are dropped
//! - nodes without a name are reported as `"Unknown"`
//! - every other optional attribute is carried through independently, absent when missing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{EntityEdge, EntityNode, SearchResults};

/// Name reported for entities the remote left unnamed
pub const UNKNOWN_ENTITY_NAME: &str = "Unknown";

/// Characters of an ingested message echoed back to the caller
pub const DISPLAY_LIMIT: usize = 100;

/// Marker appended to truncated display text
pub const ELLIPSIS: &str = "...";

/// Fallback acknowledgement when the remote returns no value
pub const DEFAULT_ACK: &str = "Added successfully";

/// Epoch values above this are taken as milliseconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// A relationship fact derived from a remote edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(rename = "fact")]
    pub text: String,
    #[serde(rename = "uuid")]
    pub id: Option<String>,
    pub created_at: Option<String>,
}

impl Fact {
    /// Build a fact from an edge, or `None` when the edge has no fact text
    pub fn from_edge(edge: &EntityEdge) -> Option<Self> {
        let text = edge.fact.clone()?;
        Some(Self {
            text,
            id: edge.uuid.clone(),
            created_at: edge.created_at.as_ref().and_then(render_timestamp),
        })
    }
}

/// An entity derived from a remote node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "uuid")]
    pub id: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<String>,
}

impl Entity {
    pub fn from_node(node: &EntityNode) -> Self {
        Self {
            name: node
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_ENTITY_NAME.to_string()),
            id: node.uuid.clone(),
            summary: node.summary.clone(),
            created_at: node.created_at.as_ref().and_then(render_timestamp),
        }
    }
}

/// The `results` block of a search response. Always structurally complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub facts: Vec<Fact>,
    pub entities: Vec<Entity>,
    pub total_facts: usize,
    pub total_entities: usize,
}

impl SearchSummary {
    pub fn new(facts: Vec<Fact>, entities: Vec<Entity>) -> Self {
        Self {
            total_facts: facts.len(),
            total_entities: entities.len(),
            facts,
            entities,
        }
    }

    /// Empty block used on failure
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Normalize a raw search result. Missing collections count as empty.
pub fn normalize_results(results: &SearchResults) -> SearchSummary {
    let facts = results
        .edges
        .iter()
        .flatten()
        .filter_map(Fact::from_edge)
        .collect();

    let entities = results.nodes.iter().flatten().map(Entity::from_node).collect();

    SearchSummary::new(facts, entities)
}

/// Truncate a message for display: first `DISPLAY_LIMIT` characters plus `ELLIPSIS` when longer
pub fn truncate_for_display(message: &str) -> String {
    match message.char_indices().nth(DISPLAY_LIMIT) {
        Some((cut, _)) => format!("{}{}", &message[..cut], ELLIPSIS),
        None => message.to_string(),
    }
}

/// String form of a remote acknowledgement, or `DEFAULT_ACK` when there is none
pub fn render_ack(ack: Option<&Value>) -> String {
    match ack {
        None | Some(Value::Null) => DEFAULT_ACK.to_string(),
        Some(Value::String(s)) if s.is_empty() => DEFAULT_ACK.to_string(),
        Some(Value::Object(map)) if map.is_empty() => DEFAULT_ACK.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// String form of a creation time. Strings pass through, integer epochs become RFC 3339.
pub fn render_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(epoch) => Some(epoch_to_rfc3339(epoch).unwrap_or_else(|| n.to_string())),
            None => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn epoch_to_rfc3339(epoch: i64) -> Option<String> {
    let datetime: Option<DateTime<Utc>> = if epoch.abs() > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    datetime.map(|dt| dt.to_rfc3339())
}
