//! Payload builders.
//!
//! Each builder produces the JSON the Q CLI would have written for the given
//! exchanges, in one of the three historical layouts.

use qhistory_store::RawRecord;
use serde_json::{Value, json};

/// Body that parses as JSON but matches no known layout
pub const MALFORMED_BODY: &str = r#"{"conversation_id": "broken", "history": "not-a-list"}"#;

/// Newer layout: `history[]` of `{ user, assistant, request_metadata }`
pub fn object_turn_payload(conversation_id: Option<&str>, exchanges: &[(&str, &str)]) -> Value {
    let history: Vec<Value> = exchanges
        .iter()
        .map(|(user, assistant)| {
            json!({
                "user": {
                    "additional_context": "",
                    "content": {"Prompt": {"prompt": user}},
                    "timestamp": null
                },
                "assistant": {"Response": {"message_id": "msg", "content": assistant}},
                "request_metadata": null
            })
        })
        .collect();

    with_id(json!({ "history": history, "tools": {} }), conversation_id)
}

/// Older layout: `history[]` of `[user, assistant]`
pub fn list_turn_payload(conversation_id: Option<&str>, exchanges: &[(&str, &str)]) -> Value {
    let history: Vec<Value> = exchanges
        .iter()
        .map(|(user, assistant)| {
            json!([
                {"content": {"Prompt": {"prompt": user}}},
                {"Response": {"message_id": "msg", "content": assistant}}
            ])
        })
        .collect();

    with_id(json!({ "history": history }), conversation_id)
}

/// LokiJS export layout. `messages` are `(type, body)` pairs, e.g. `("prompt", "hi")`.
pub fn nested_payload(conversation_id: Option<&str>, messages: &[(&str, &str)]) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|(kind, body)| json!({"type": kind, "body": body}))
        .collect();

    let mut conversation = json!({ "messages": messages });
    if let Some(id) = conversation_id {
        conversation["conversationId"] = json!(id);
    }

    json!({
        "collections": [{
            "name": "tabs",
            "data": [{
                "historyId": "tab-fixture",
                "conversations": [conversation]
            }]
        }]
    })
}

/// Attach request metadata to the `turn`-th history entry (object or list layout)
pub fn attach_metadata(mut payload: Value, turn: usize, metadata: Value) -> Value {
    if let Some(entry) = payload
        .get_mut("history")
        .and_then(|history| history.get_mut(turn))
    {
        match entry {
            Value::Object(map) => {
                map.insert("request_metadata".to_string(), metadata);
            }
            Value::Array(items) => items.push(metadata),
            _ => {}
        }
    }
    payload
}

fn with_id(mut payload: Value, conversation_id: Option<&str>) -> Value {
    if let Some(id) = conversation_id {
        payload["conversation_id"] = json!(id);
    }
    payload
}

/// Build a raw record from a payload
pub fn record(key: &str, store_sequence: i64, payload: &Value) -> RawRecord {
    RawRecord::new(key, store_sequence, payload.to_string().into_bytes())
}

/// Five valid conversations across all layouts plus one malformed record.
///
/// Returned as `(workspace key, body)` in insertion order. Searching for
/// `git` matches `conv-shop` (2 turns), then `conv-web` and `conv-infra`
/// (1 turn each).
pub fn sample_bodies() -> Vec<(String, String)> {
    let entries: Vec<(&str, String)> = vec![
        (
            "/home/dev/shop-api",
            object_turn_payload(
                Some("conv-shop"),
                &[
                    ("show me git status", "On branch main"),
                    ("commit the fix", "Ran git commit -m fix"),
                ],
            )
            .to_string(),
        ),
        (
            "/home/dev/infra",
            list_turn_payload(
                Some("conv-infra"),
                &[
                    ("How do I list docker containers?", "Use docker ps"),
                    ("and git log?", "git log --oneline"),
                ],
            )
            .to_string(),
        ),
        (
            "/home/dev/k8s",
            nested_payload(
                Some("conv-k8s"),
                &[("prompt", "deploy to k8s"), ("answer", "Here's how...")],
            )
            .to_string(),
        ),
        ("/home/dev/broken", MALFORMED_BODY.to_string()),
        (
            "/home/dev/notes",
            object_turn_payload(None, &[("summarize the meeting notes", "Here is a summary")])
                .to_string(),
        ),
        (
            "/home/dev/web",
            object_turn_payload(
                Some("conv-web"),
                &[
                    ("fix the CSS grid", "Use grid-template-columns"),
                    ("push to GIT remote", "Pushed"),
                ],
            )
            .to_string(),
        ),
    ];

    entries
        .into_iter()
        .map(|(key, body)| (key.to_string(), body))
        .collect()
}

/// `sample_bodies` as raw records with sequences 1..=6
pub fn sample_records() -> Vec<RawRecord> {
    sample_bodies()
        .into_iter()
        .zip(1..)
        .map(|((key, body), sequence)| RawRecord::new(key, sequence, body.into_bytes()))
        .collect()
}
