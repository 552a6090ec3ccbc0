use qhistory_store::RawRecord;
use qhistory_types::{Conversation, Turn, is_blank};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::detect::{DetectedShape, MalformedReason, detect};
use crate::identity::resolve_conversation_id;
use crate::schema::declared_conversation_id;
use crate::{list_turn, nested, object_turn};

/// Output of one variant normalizer before identity resolution
#[derive(Debug, Default)]
pub(crate) struct Normalized {
    pub declared_id: Option<String>,
    pub turns: Vec<Turn>,
}

/// A record that could not be turned into a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    pub key: String,
    pub store_sequence: i64,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (row {}): {}", self.key, self.store_sequence, self.reason)
    }
}

impl std::error::Error for MalformedRecord {}

/// Normalize a raw store record.
///
/// Never fails the caller's cycle: every problem is reported as a
/// `MalformedRecord` for that one record.
pub fn normalize_record(record: &RawRecord) -> Result<Conversation, MalformedRecord> {
    let malformed = |reason: MalformedReason| {
        if reason.is_benign() {
            tracing::debug!(key = %record.key, reason = %reason, "skipping empty record");
        } else {
            tracing::warn!(
                key = %record.key,
                row = record.store_sequence,
                reason = %reason,
                "skipping malformed record"
            );
        }
        MalformedRecord {
            key: record.key.clone(),
            store_sequence: record.store_sequence,
            reason,
        }
    };

    let payload = record
        .payload()
        .map_err(|e| malformed(MalformedReason::InvalidJson(e.to_string())))?;

    normalize_payload(&record.key, record.store_sequence, &payload).map_err(malformed)
}

/// Normalize an already-parsed payload stored under `workspace`.
///
/// The returned conversation may hold zero turns when every exchange was
/// blank; callers decide whether to retain it.
pub fn normalize_payload(
    workspace: &str,
    store_sequence: i64,
    payload: &Value,
) -> Result<Conversation, MalformedReason> {
    let shape = detect(payload)?;
    let variant = shape.variant();
    tracing::debug!(workspace, variant = %variant, "detected schema variant");

    let normalized = match shape {
        DetectedShape::NestedCollection { conversations } => {
            nested::normalize(workspace, &conversations)
        }
        DetectedShape::ObjectTurn { history } => Normalized {
            declared_id: declared_conversation_id(payload).map(str::to_string),
            turns: object_turn::normalize(workspace, history),
        },
        DetectedShape::ListTurn { history } => Normalized {
            declared_id: declared_conversation_id(payload).map(str::to_string),
            turns: list_turn::normalize(workspace, history),
        },
    };

    let before = normalized.turns.len();
    let turns: Vec<Turn> = normalized
        .turns
        .into_iter()
        .filter(|turn| !is_blank(&turn.user_text))
        .collect();
    if turns.len() < before {
        tracing::debug!(
            workspace,
            dropped = before - turns.len(),
            "dropped turns without user text"
        );
    }

    let id = resolve_conversation_id(normalized.declared_id.as_deref(), workspace);
    Ok(Conversation::new(id, workspace, store_sequence, variant, turns))
}
