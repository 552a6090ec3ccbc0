use serde::Deserialize;
use serde_json::Value;

// Object-turn format: one object per exchange
#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct HistoryEntry {
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub assistant: Option<Value>,
    #[serde(default)]
    pub request_metadata: Option<Value>,
}

// Nested-collection format: a conversation inside a LokiJS tab
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NestedConversation {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NestedTab {
    #[serde(default)]
    pub history_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct NestedMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageRole {
    Prompt,
    Answer,
    Other,
}

impl NestedMessage {
    pub fn role(&self) -> MessageRole {
        match self.kind.as_deref() {
            Some(kind) if kind.eq_ignore_ascii_case("prompt") => MessageRole::Prompt,
            Some(kind) if kind.eq_ignore_ascii_case("answer") => MessageRole::Answer,
            _ => MessageRole::Other,
        }
    }
}

/// Top-level id declared by object/list-turn payloads
pub(crate) fn declared_conversation_id(payload: &Value) -> Option<&str> {
    payload
        .get("conversation_id")
        .or_else(|| payload.get("conversationId"))
        .and_then(Value::as_str)
}
