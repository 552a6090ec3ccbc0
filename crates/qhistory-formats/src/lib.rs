// Schema detection
pub mod detect;

// Conversation identity resolution
pub mod identity;

// Variant normalizers
mod list_turn;
mod nested;
mod object_turn;

// Payload schemas and text extraction
pub(crate) mod schema;
pub(crate) mod text;

// Record normalization entry point
pub mod normalize;

pub use detect::{DetectedShape, MalformedReason, NestedSource, detect};
pub use identity::{derive_conversation_id, is_well_formed_id, resolve_conversation_id};
pub use normalize::{MalformedRecord, normalize_payload, normalize_record};
