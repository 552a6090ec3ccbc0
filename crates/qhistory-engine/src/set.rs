use qhistory_formats::{MalformedRecord, derive_conversation_id, normalize_record};
use qhistory_store::RawRecord;
use qhistory_types::Conversation;
use std::collections::{HashMap, HashSet};

use crate::order::assign_estimated_order;

/// Every retained conversation from one pass over the store.
///
/// Conversations with zero turns are not retained; their workspace keys are
/// kept for diagnostics, as are the malformed records.
#[derive(Debug, Clone, Default)]
pub struct ConversationSet {
    /// Newest first
    conversations: Vec<Conversation>,
    index: HashMap<String, usize>,
    malformed: Vec<MalformedRecord>,
    empty: Vec<String>,
    record_count: usize,
}

impl ConversationSet {
    /// Normalize every record and assemble the set.
    ///
    /// A bad record only ever costs that record.
    pub fn build(records: &[RawRecord]) -> Self {
        let mut normalized = Vec::with_capacity(records.len());
        let mut malformed = Vec::new();
        let mut empty = Vec::new();

        for record in records {
            match normalize_record(record) {
                Ok(conversation) if conversation.is_empty() => {
                    tracing::debug!(key = %record.key, "conversation has no turns, not retained");
                    empty.push(conversation.workspace);
                }
                Ok(conversation) => normalized.push(conversation),
                Err(bad) => malformed.push(bad),
            }
        }

        let mut set = Self::from_conversations(normalized);
        set.malformed = malformed;
        set.empty = empty;
        set.record_count = records.len();
        set
    }

    /// Assemble a set from already-normalized conversations.
    ///
    /// Ids must be unique within a set. When two conversations declare the
    /// same id, the one with the lower store sequence keeps it and the other
    /// falls back to its key-derived id.
    pub fn from_conversations(mut conversations: Vec<Conversation>) -> Self {
        conversations.sort_by(|a, b| {
            a.store_sequence
                .cmp(&b.store_sequence)
                .then_with(|| a.workspace.cmp(&b.workspace))
        });

        let mut seen = HashSet::with_capacity(conversations.len());
        for conversation in &mut conversations {
            if seen.contains(&conversation.id) {
                let mut fallback = derive_conversation_id(&conversation.workspace);
                if seen.contains(&fallback) {
                    fallback = derive_conversation_id(&format!(
                        "{}#{}",
                        conversation.workspace, conversation.store_sequence
                    ));
                }
                tracing::debug!(
                    workspace = %conversation.workspace,
                    declared = %conversation.id,
                    assigned = %fallback,
                    "duplicate conversation id"
                );
                conversation.id = fallback;
            }
            seen.insert(conversation.id.clone());
        }

        assign_estimated_order(&mut conversations);

        let index = conversations
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let record_count = conversations.len();
        Self {
            conversations,
            index,
            malformed: Vec::new(),
            empty: Vec::new(),
            record_count,
        }
    }

    /// Retained conversations, newest first
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.index.get(id).map(|&i| &self.conversations[i])
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn malformed(&self) -> &[MalformedRecord] {
        &self.malformed
    }

    /// Workspace keys whose records normalized to zero turns
    pub fn empty_workspaces(&self) -> &[String] {
        &self.empty
    }

    /// Records read from the store, whatever became of them
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhistory_testing::fixtures::{MALFORMED_BODY, object_turn_payload, record};

    #[test]
    fn test_build_separates_retained_empty_and_malformed() {
        let records = vec![
            record("/a", 1, &object_turn_payload(Some("a"), &[("hi", "hello")])),
            record("/b", 2, &object_turn_payload(Some("b"), &[("   ", "blank user")])),
            RawRecord::new("/c", 3, MALFORMED_BODY.as_bytes().to_vec()),
        ];

        let set = ConversationSet::build(&records);

        assert_eq!(set.len(), 1);
        assert_eq!(set.record_count(), 3);
        assert_eq!(set.empty_workspaces(), &["/b".to_string()]);
        assert_eq!(set.malformed().len(), 1);
        assert_eq!(set.malformed()[0].key, "/c");
        assert_eq!(set.conversations()[0].estimated_order.population, 1);
    }

    #[test]
    fn test_duplicate_ids_fall_back_to_derived() {
        let records = vec![
            record("/later", 5, &object_turn_payload(Some("dup"), &[("second", "")])),
            record("/earlier", 1, &object_turn_payload(Some("dup"), &[("first", "")])),
        ];

        let set = ConversationSet::build(&records);

        assert_eq!(set.get("dup").unwrap().workspace, "/earlier");
        let derived = derive_conversation_id("/later");
        assert_eq!(set.get(&derived).unwrap().workspace, "/later");
    }

    #[test]
    fn test_lookup_by_id() {
        let records = vec![record("/a", 1, &object_turn_payload(Some("a-1"), &[("q", "a")]))];

        let set = ConversationSet::build(&records);

        assert!(set.get("a-1").is_some());
        assert!(set.get("nonexistent-id").is_none());
    }
}
