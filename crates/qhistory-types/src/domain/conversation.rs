use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::order::EstimatedOrder;

/// Agent identity placeholder.
///
/// The Q CLI never persists which agent profile produced a conversation, so
/// every conversation reports this value instead of omitting the field.
pub const AGENT_UNKNOWN: &str = "unknown";

/// Free-form request metadata attached to a turn by the upstream writer.
pub type TurnMetadata = Map<String, Value>;

/// On-disk shape a record's payload was written in.
///
/// The Q CLI changed its persistence format several times; each variant has
/// exactly one normalizer in `qhistory-formats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// LokiJS-style export: `collections[].data[].conversations[].messages[]`
    NestedCollection,
    /// Newer CLI shape: `history[]` of `{ user, assistant, request_metadata }`
    ObjectTurn,
    /// Older CLI shape: `history[]` of `[user, assistant, metadata?]`
    ListTurn,
}

impl SchemaVariant {
    pub fn all() -> [SchemaVariant; 3] {
        [
            SchemaVariant::NestedCollection,
            SchemaVariant::ObjectTurn,
            SchemaVariant::ListTurn,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::NestedCollection => "nested_collection",
            SchemaVariant::ObjectTurn => "object_turn",
            SchemaVariant::ListTurn => "list_turn",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_text: String,
    /// May be a truncated fragment or empty; that is how the upstream data
    /// looks, not a normalization failure.
    pub assistant_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TurnMetadata>,
}

impl Turn {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Option<TurnMetadata>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Canonical conversation reconstructed from one store record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Record key: the directory the Q CLI session was started in.
    pub workspace: String,
    pub turns: Vec<Turn>,
    pub estimated_order: EstimatedOrder,
    /// SQLite rowid of the source record. Ordering input only.
    pub store_sequence: i64,
    pub schema_variant: SchemaVariant,
    pub agent: String,
}

impl Conversation {
    pub fn new(
        id: impl Into<String>,
        workspace: impl Into<String>,
        store_sequence: i64,
        schema_variant: SchemaVariant,
        turns: Vec<Turn>,
    ) -> Self {
        Self {
            id: id.into(),
            workspace: workspace.into(),
            turns,
            estimated_order: EstimatedOrder::default(),
            store_sequence,
            schema_variant,
            agent: AGENT_UNKNOWN.to_string(),
        }
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn first_user_text(&self) -> Option<&str> {
        self.turns.first().map(|t| t.user_text.as_str())
    }

    pub fn has_metadata(&self) -> bool {
        self.turns.iter().any(|t| t.metadata.is_some())
    }
}
