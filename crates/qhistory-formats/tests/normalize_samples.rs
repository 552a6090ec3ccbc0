use qhistory_formats::{MalformedReason, derive_conversation_id, normalize_payload, normalize_record};
use qhistory_store::RawRecord;
use qhistory_types::{Conversation, SchemaVariant};
use serde_json::Value;
use std::path::Path;

fn load_sample(name: &str) -> anyhow::Result<Value> {
    let path = Path::new("tests/samples").join(name);
    let text = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

fn render(conversation: &Conversation) -> String {
    let mut out = format!(
        "id: {}\nvariant: {}\nturns: {}\n",
        conversation.id,
        conversation.schema_variant,
        conversation.turns.len()
    );
    for (i, turn) in conversation.turns.iter().enumerate() {
        let n = i + 1;
        out.push_str(&format!("\n[{n}] user: {}\n", turn.user_text));
        out.push_str(&format!("[{n}] assistant: {}\n", turn.assistant_text));
        if let Some(metadata) = &turn.metadata {
            let mut keys: Vec<&str> = metadata.keys().map(String::as_str).collect();
            keys.sort_unstable();
            out.push_str(&format!("[{n}] metadata: {}\n", keys.join(", ")));
        }
    }
    out
}

#[test]
fn test_object_turn_sample_snapshot() -> anyhow::Result<()> {
    let payload = load_sample("object_turn.json")?;
    let conversation = normalize_payload("/home/dev/shop-api", 1, &payload)?;

    insta::assert_snapshot!("object_turn_sample", render(&conversation));
    Ok(())
}

#[test]
fn test_list_turn_sample_counts_valid_pairs() -> anyhow::Result<()> {
    let payload = load_sample("list_turn.json")?;
    let conversation = normalize_payload("/home/dev/infra", 2, &payload)?;

    assert_eq!(conversation.schema_variant, SchemaVariant::ListTurn);
    assert_eq!(conversation.id, "1c9f2d44-5b7a-4e61-a0d3-6f2b8c9e7a15");
    assert_eq!(conversation.turns.len(), 2);
    assert_eq!(conversation.turns[1].assistant_text, "docker container prune");
    assert_eq!(
        conversation.turns[1].metadata.as_ref().unwrap()["model_id"],
        "claude-3-7-sonnet"
    );
    Ok(())
}

#[test]
fn test_nested_sample_uses_first_conversation() -> anyhow::Result<()> {
    let payload = load_sample("nested_collection.json")?;
    let conversation = normalize_payload("/home/dev/k8s", 3, &payload)?;

    assert_eq!(conversation.schema_variant, SchemaVariant::NestedCollection);
    assert_eq!(conversation.id, "conv-k8s-001");
    assert_eq!(conversation.turns.len(), 2);
    assert_eq!(conversation.turns[0].user_text, "deploy to k8s");
    assert_eq!(conversation.turns[0].assistant_text, "Here's how...");
    assert!(!conversation.has_metadata());
    Ok(())
}

#[test]
fn test_malformed_sample_is_rejected() -> anyhow::Result<()> {
    let payload = load_sample("malformed.json")?;

    let err = normalize_payload("/home/dev/broken", 4, &payload).unwrap_err();
    assert_eq!(err, MalformedReason::UnrecognizedShape);
    assert!(!err.is_benign());
    Ok(())
}

#[test]
fn test_non_utf8_body_is_malformed_not_fatal() {
    let record = RawRecord::new("/bin", 9, vec![0xff, 0xfe, 0x00]);

    let err = normalize_record(&record).unwrap_err();
    assert!(matches!(err.reason, MalformedReason::InvalidJson(_)));
    assert!(err.to_string().starts_with("/bin (row 9): invalid JSON"));
}

#[test]
fn test_normalization_is_idempotent() -> anyhow::Result<()> {
    let payload = load_sample("list_turn.json")?;
    let mut without_id = payload.clone();
    without_id
        .as_object_mut()
        .unwrap()
        .remove("conversation_id");

    let first = normalize_payload("/home/dev/infra", 2, &without_id)?;
    let second = normalize_payload("/home/dev/infra", 2, &without_id)?;

    assert_eq!(first, second);
    assert_eq!(first.id, derive_conversation_id("/home/dev/infra"));
    Ok(())
}
