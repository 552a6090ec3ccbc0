use qhistory_types::TurnMetadata;
use serde_json::Value;

/// Text of a user message.
///
/// Known shapes, newest first:
/// - `{"content": {"Prompt": {"prompt": "..."}}}`
/// - `{"content": "..."}`
/// - `{"content": {"text": "..."}}`
/// - `"..."`
///
/// Tool-result messages (`{"content": {"ToolUseResults": ...}}`) carry no
/// user text and yield `None`.
pub(crate) fn user_text(message: &Value) -> Option<String> {
    match message {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => {
            let content = map.get("content")?;
            match content {
                Value::String(text) => Some(text.clone()),
                Value::Object(inner) => inner
                    .get("Prompt")
                    .and_then(|prompt| prompt.get("prompt"))
                    .or_else(|| inner.get("text"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Text of an assistant message.
///
/// Known shapes:
/// - `{"Response": {"content": "..."}}`
/// - `{"ToolUse": {"content": "...", "tool_uses": [...]}}`
/// - `{"content": "..."}`
/// - `"..."`
pub(crate) fn assistant_text(message: &Value) -> Option<String> {
    match message {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => ["Response", "ToolUse"]
            .iter()
            .find_map(|tag| map.get(*tag).and_then(|inner| inner.get("content")))
            .or_else(|| map.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Metadata is kept only when it is a JSON object
pub(crate) fn metadata(value: Option<&Value>) -> Option<TurnMetadata> {
    match value {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    }
}
