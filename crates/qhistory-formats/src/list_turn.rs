use qhistory_types::Turn;
use serde_json::Value;

use crate::detect::is_list_turn_entry;
use crate::text::{assistant_text, metadata, user_text};

/// Normalize `history[]` entries of the older `[user, assistant, metadata?]` shape
pub(crate) fn normalize(workspace: &str, history: &[Value]) -> Vec<Turn> {
    history
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            if !is_list_turn_entry(raw) {
                tracing::debug!(workspace, index, "skipping history entry of another shape");
                return None;
            }
            let items = raw.as_array()?;
            let user = user_text(&items[0]).unwrap_or_default();
            let assistant = assistant_text(&items[1]).unwrap_or_default();
            Some(Turn::new(user, assistant).with_metadata(metadata(items.get(2))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_pairs_with_optional_metadata() {
        let history = vec![
            json!([
                {"content": {"Prompt": {"prompt": "what is rust"}}},
                {"Response": {"content": "A language"}}
            ]),
            json!([
                {"content": "and cargo?"},
                {"content": "A build tool"},
                {"request_id": "r-2"}
            ]),
        ];

        let turns = normalize("/ws", &history);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].user_text, "what is rust");
        assert_eq!(turns[0].assistant_text, "A language");
        assert!(turns[0].metadata.is_none());
        assert_eq!(turns[1].metadata.as_ref().unwrap()["request_id"], "r-2");
    }

    #[test]
    fn test_wrong_length_entries_are_skipped() {
        let history = vec![
            json!([{"content": "lonely"}]),
            json!([{"content": "a"}, {"content": "b"}, {}, {}]),
            json!([{"content": "ok"}, {"content": "fine"}, "not metadata"]),
        ];

        let turns = normalize("/ws", &history);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].user_text, "ok");
        assert!(turns[0].metadata.is_none());
    }
}
