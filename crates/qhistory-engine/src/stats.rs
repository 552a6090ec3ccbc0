use qhistory_formats::MalformedRecord;
use qhistory_types::SchemaVariant;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::set::ConversationSet;

/// Counts describing how a set was assembled from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetStats {
    pub record_count: usize,
    pub conversation_count: usize,
    pub turn_count: usize,
    /// Retained conversations per schema variant; every variant is present
    pub variant_counts: BTreeMap<SchemaVariant, usize>,
    pub empty_count: usize,
    pub malformed: Vec<MalformedRecord>,
}

impl ConversationSet {
    pub fn stats(&self) -> SetStats {
        let mut variant_counts: BTreeMap<SchemaVariant, usize> =
            SchemaVariant::all().into_iter().map(|v| (v, 0)).collect();
        for conversation in self.conversations() {
            *variant_counts.entry(conversation.schema_variant).or_default() += 1;
        }

        SetStats {
            record_count: self.record_count(),
            conversation_count: self.len(),
            turn_count: self.conversations().iter().map(|c| c.turn_count()).sum(),
            variant_counts,
            empty_count: self.empty_workspaces().len(),
            malformed: self.malformed().to_vec(),
        }
    }
}
