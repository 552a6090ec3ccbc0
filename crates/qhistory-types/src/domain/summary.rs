use serde::{Deserialize, Serialize};

use super::conversation::{Conversation, SchemaVariant};
use super::order::EstimatedOrder;
use crate::util::preview;

/// Conversation summary for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub workspace: String,
    pub schema_variant: SchemaVariant,
    pub agent: String,
    pub turn_count: usize,
    /// First user message, truncated for display
    pub preview: String,
    pub estimated_order: EstimatedOrder,
    /// Human-readable rendering of `estimated_order`
    pub recency: String,
}

impl ConversationSummary {
    pub fn from_conversation(conversation: &Conversation, preview_chars: usize) -> Self {
        Self {
            id: conversation.id.clone(),
            workspace: conversation.workspace.clone(),
            schema_variant: conversation.schema_variant,
            agent: conversation.agent.clone(),
            turn_count: conversation.turn_count(),
            preview: conversation
                .first_user_text()
                .map(|text| preview(text, preview_chars))
                .unwrap_or_default(),
            estimated_order: conversation.estimated_order,
            recency: conversation.estimated_order.to_string(),
        }
    }
}

/// Search result: one matching conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub conversation: ConversationSummary,
    /// Number of turns containing the query
    pub matching_turns: usize,
    /// 1-based index of the first matching turn
    pub first_match_turn: usize,
    /// User text of the first matching turn, truncated
    pub snippet: String,
}
