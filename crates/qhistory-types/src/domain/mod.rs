mod conversation;
mod order;
mod summary;

pub use conversation::{AGENT_UNKNOWN, Conversation, SchemaVariant, Turn, TurnMetadata};
pub use order::EstimatedOrder;
pub use summary::{ConversationSummary, SearchHit};
