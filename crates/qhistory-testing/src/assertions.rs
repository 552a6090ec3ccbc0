//! Assertions over `--format json` output.

use anyhow::{Context, Result};
use serde_json::Value;

fn conversations(json: &Value) -> Result<&Vec<Value>> {
    json["conversations"]
        .as_array()
        .context("Expected 'conversations' array in JSON")
}

/// Assert that a list result holds `expected` conversations.
pub fn assert_conversation_count(json: &Value, expected: usize) -> Result<()> {
    let conversations = conversations(json)?;

    if conversations.len() != expected {
        anyhow::bail!(
            "Expected {} conversations, got {}",
            expected,
            conversations.len()
        );
    }

    Ok(())
}

/// Assert that conversations come newest first (strictly descending rank).
pub fn assert_newest_first(json: &Value) -> Result<()> {
    let ranks = conversations(json)?
        .iter()
        .enumerate()
        .map(|(i, c)| {
            c["estimated_order"]["rank"]
                .as_u64()
                .with_context(|| format!("Conversation {} missing estimated_order.rank", i))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(pair) = ranks.windows(2).find(|pair| pair[0] <= pair[1]) {
        anyhow::bail!("Ranks not strictly descending: {} then {}", pair[0], pair[1]);
    }

    Ok(())
}
