// Engine - builds the normalized conversation set and answers queries over it
// Pure: no I/O, no caching. The runtime owns both.

mod error;
mod export;
mod order;
mod query;
mod set;
mod stats;

pub use error::{Error, Result};
pub use export::{NO_RESPONSE_PLACEHOLDER, render_markdown};
pub use order::assign_estimated_order;
pub use query::{ConversationDetail, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, QueryOptions};
pub use set::ConversationSet;
pub use stats::SetStats;
