use qhistory_types::{Conversation, is_blank};
use std::fmt::Write;

use crate::error::Result;
use crate::set::ConversationSet;

pub const NO_RESPONSE_PLACEHOLDER: &str = "_No response recorded._";

/// Render a conversation as a markdown document.
///
/// Output depends only on the conversation, so repeated exports of an
/// unchanged store are byte-identical.
pub fn render_markdown(conversation: &Conversation) -> String {
    let mut out = String::new();

    // write! into a String cannot fail
    let _ = write!(
        out,
        "# Conversation {}\n\n**Workspace:** {}\n\n",
        conversation.id, conversation.workspace
    );

    for (i, turn) in conversation.turns.iter().enumerate() {
        let assistant = if is_blank(&turn.assistant_text) {
            NO_RESPONSE_PLACEHOLDER
        } else {
            turn.assistant_text.as_str()
        };
        let _ = write!(
            out,
            "### Turn {}\n\n**User:**\n\n{}\n\n**Assistant:**\n\n{}\n\n",
            i + 1,
            turn.user_text,
            assistant
        );
    }

    if conversation.has_metadata() {
        out.push_str("## Metadata\n\n");
        for (i, turn) in conversation.turns.iter().enumerate() {
            let Some(metadata) = &turn.metadata else {
                continue;
            };
            let pretty = serde_json::to_string_pretty(metadata).unwrap_or_default();
            let _ = write!(out, "### Turn {}\n\n```json\n{}\n```\n\n", i + 1, pretty);
        }
    }

    // Single trailing newline
    out.pop();
    out
}

impl ConversationSet {
    pub fn export_markdown(&self, id: &str) -> Result<String> {
        self.get_detail(id).map(|c| render_markdown(&c))
    }
}
