use uuid::Uuid;

const MAX_ID_LEN: usize = 128;

/// Check whether a payload-declared id can be used as-is.
///
/// Accepts 1-128 ASCII alphanumerics, `-` and `_`. UUIDs (what the Q CLI
/// writes) always pass.
pub fn is_well_formed_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Stable id for a record that declares none (or a bad one).
///
/// UUIDv5 of the workspace key, so the same record gets the same id on
/// every run without persisting anything.
pub fn derive_conversation_id(workspace_key: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, workspace_key.as_bytes()).to_string()
}

/// Use the declared id when well formed, else derive one from the key
pub fn resolve_conversation_id(declared: Option<&str>, workspace_key: &str) -> String {
    match declared {
        Some(id) if is_well_formed_id(id) => id.to_string(),
        Some(id) => {
            tracing::debug!(
                workspace = workspace_key,
                declared = id,
                "declared conversation id is not well formed, deriving from key"
            );
            derive_conversation_id(workspace_key)
        }
        None => derive_conversation_id(workspace_key),
    }
}
