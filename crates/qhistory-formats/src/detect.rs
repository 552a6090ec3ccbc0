use qhistory_types::SchemaVariant;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

// NOTE: Detection Order
//
// The nested LokiJS export is checked first because a tab object inside it
// may itself carry a `history` field; checking `history` first would
// misclassify it. Object-turn is checked before list-turn because the newer
// CLI writes object entries, and a history that mixes both kinds (seen after
// partial upgrades) is read with the newer rules.

/// Conversation object found inside a nested-collection payload.
#[derive(Debug, Clone, Copy)]
pub struct NestedSource<'a> {
    /// The conversation object holding `messages`
    pub conversation: &'a Value,
    /// Enclosing tab entry, when the conversation sits under `data[]`
    pub tab: Option<&'a Value>,
}

/// Payload classified into one known variant, with borrowed accessors into it.
#[derive(Debug, Clone)]
pub enum DetectedShape<'a> {
    NestedCollection { conversations: Vec<NestedSource<'a>> },
    ObjectTurn { history: &'a [Value] },
    ListTurn { history: &'a [Value] },
}

impl DetectedShape<'_> {
    pub fn variant(&self) -> SchemaVariant {
        match self {
            DetectedShape::NestedCollection { .. } => SchemaVariant::NestedCollection,
            DetectedShape::ObjectTurn { .. } => SchemaVariant::ObjectTurn,
            DetectedShape::ListTurn { .. } => SchemaVariant::ListTurn,
        }
    }
}

/// Why a record matched no known variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MalformedReason {
    /// Body is not valid JSON
    InvalidJson(String),
    /// Top-level JSON value is not an object
    NotAnObject,
    /// `history` exists but holds no entries
    EmptyHistory,
    /// `collections` exists but holds no conversation with messages
    EmptyCollection,
    /// None of the known shapes matched
    UnrecognizedShape,
}

impl MalformedReason {
    /// True for records that are well-formed but simply have nothing in them yet
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            MalformedReason::EmptyHistory | MalformedReason::EmptyCollection
        )
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::InvalidJson(err) => write!(f, "invalid JSON: {}", err),
            MalformedReason::NotAnObject => write!(f, "payload is not a JSON object"),
            MalformedReason::EmptyHistory => write!(f, "history is empty"),
            MalformedReason::EmptyCollection => {
                write!(f, "collections contain no conversation messages")
            }
            MalformedReason::UnrecognizedShape => write!(f, "no known schema variant matched"),
        }
    }
}

impl std::error::Error for MalformedReason {}

/// Classify a payload. First match wins.
pub fn detect(payload: &Value) -> Result<DetectedShape<'_>, MalformedReason> {
    let Some(root) = payload.as_object() else {
        return Err(MalformedReason::NotAnObject);
    };

    let mut saw_empty_collection = false;
    if let Some(collections) = root.get("collections").and_then(Value::as_array) {
        let conversations = nested_conversations(collections);
        if conversations
            .iter()
            .any(|source| source.conversation.get("messages").is_some_and(Value::is_array))
        {
            return Ok(DetectedShape::NestedCollection { conversations });
        }
        saw_empty_collection = true;
    }

    if let Some(history) = root.get("history").and_then(Value::as_array) {
        if history.iter().any(is_object_turn_entry) {
            return Ok(DetectedShape::ObjectTurn { history });
        }
        if history.iter().any(is_list_turn_entry) {
            return Ok(DetectedShape::ListTurn { history });
        }
        if history.is_empty() {
            return Err(MalformedReason::EmptyHistory);
        }
    }

    if saw_empty_collection {
        return Err(MalformedReason::EmptyCollection);
    }

    Err(MalformedReason::UnrecognizedShape)
}

/// Collect conversation objects in container order.
///
/// Accepts both `collections[].conversations[]` and the LokiJS tab layout
/// `collections[].data[].conversations[]`.
fn nested_conversations(collections: &[Value]) -> Vec<NestedSource<'_>> {
    let mut sources = Vec::new();

    for collection in collections {
        if let Some(conversations) = collection.get("conversations").and_then(Value::as_array) {
            sources.extend(
                conversations
                    .iter()
                    .filter(|c| c.is_object())
                    .map(|conversation| NestedSource {
                        conversation,
                        tab: None,
                    }),
            );
        }

        let Some(data) = collection.get("data").and_then(Value::as_array) else {
            continue;
        };
        for tab in data {
            let Some(conversations) = tab.get("conversations").and_then(Value::as_array) else {
                continue;
            };
            sources.extend(
                conversations
                    .iter()
                    .filter(|c| c.is_object())
                    .map(|conversation| NestedSource {
                        conversation,
                        tab: Some(tab),
                    }),
            );
        }
    }

    sources
}

pub(crate) fn is_object_turn_entry(entry: &Value) -> bool {
    entry.get("user").is_some_and(Value::is_object)
}

pub(crate) fn is_list_turn_entry(entry: &Value) -> bool {
    entry
        .as_array()
        .is_some_and(|items| (2..=3).contains(&items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_nested_tab_layout() {
        let payload = json!({
            "collections": [{
                "name": "tabs",
                "data": [{
                    "historyId": "h-1",
                    "conversations": [{
                        "conversationId": "c-1",
                        "messages": [{"type": "prompt", "body": "hi"}]
                    }]
                }]
            }]
        });

        let shape = detect(&payload).unwrap();
        assert_eq!(shape.variant(), SchemaVariant::NestedCollection);
        match shape {
            DetectedShape::NestedCollection { conversations } => {
                assert_eq!(conversations.len(), 1);
                assert!(conversations[0].tab.is_some());
            }
            _ => panic!("Expected nested shape"),
        }
    }

    #[test]
    fn test_detects_nested_direct_layout() {
        let payload = json!({
            "collections": [{
                "conversations": [{"messages": []}]
            }]
        });

        assert_eq!(
            detect(&payload).unwrap().variant(),
            SchemaVariant::NestedCollection
        );
    }

    #[test]
    fn test_nested_wins_over_history() {
        let payload = json!({
            "history": [{"user": {}, "assistant": {}}],
            "collections": [{"conversations": [{"messages": []}]}]
        });

        assert_eq!(
            detect(&payload).unwrap().variant(),
            SchemaVariant::NestedCollection
        );
    }

    #[test]
    fn test_detects_object_turn() {
        let payload = json!({
            "history": [{"user": {"content": {"Prompt": {"prompt": "hi"}}}, "assistant": {}}]
        });
        assert_eq!(detect(&payload).unwrap().variant(), SchemaVariant::ObjectTurn);
    }

    #[test]
    fn test_detects_list_turn() {
        let payload = json!({
            "history": [[{"content": {"Prompt": {"prompt": "hi"}}}, {"Response": {"content": "yo"}}]]
        });
        assert_eq!(detect(&payload).unwrap().variant(), SchemaVariant::ListTurn);
    }

    #[test]
    fn test_mixed_history_reads_as_object_turn() {
        let payload = json!({
            "history": [
                [{"content": "old"}, {"content": "old answer"}],
                {"user": {"content": "new"}, "assistant": {"content": "new answer"}}
            ]
        });
        assert_eq!(detect(&payload).unwrap().variant(), SchemaVariant::ObjectTurn);
    }

    #[test]
    fn test_malformed_classifications() {
        assert_eq!(detect(&json!([1, 2])).unwrap_err(), MalformedReason::NotAnObject);
        assert_eq!(
            detect(&json!({"history": []})).unwrap_err(),
            MalformedReason::EmptyHistory
        );
        assert_eq!(
            detect(&json!({"history": [1, "two", [3]]})).unwrap_err(),
            MalformedReason::UnrecognizedShape
        );
        assert_eq!(
            detect(&json!({"collections": [{"data": []}]})).unwrap_err(),
            MalformedReason::EmptyCollection
        );
        assert_eq!(
            detect(&json!({"something": "else"})).unwrap_err(),
            MalformedReason::UnrecognizedShape
        );
    }
}
