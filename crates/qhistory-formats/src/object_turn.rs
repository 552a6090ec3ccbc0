use qhistory_types::Turn;
use serde::Deserialize;
use serde_json::Value;

use crate::detect::is_object_turn_entry;
use crate::schema::HistoryEntry;
use crate::text::{assistant_text, metadata, user_text};

/// Normalize `history[]` entries of the `{ user, assistant, request_metadata }` shape
pub(crate) fn normalize(workspace: &str, history: &[Value]) -> Vec<Turn> {
    history
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            if !is_object_turn_entry(raw) {
                tracing::debug!(workspace, index, "skipping history entry of another shape");
                return None;
            }
            let entry = HistoryEntry::deserialize(raw).ok()?;
            let user = entry.user.as_ref().and_then(user_text).unwrap_or_default();
            let assistant = entry
                .assistant
                .as_ref()
                .and_then(assistant_text)
                .unwrap_or_default();
            Some(
                Turn::new(user, assistant)
                    .with_metadata(metadata(entry.request_metadata.as_ref())),
            )
        })
        .collect()
}
