use qhistory_types::{Conversation, ConversationSummary, DEFAULT_PREVIEW_CHARS, SearchHit, preview};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::set::ConversationSet;

pub const DEFAULT_LIST_LIMIT: usize = 20;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Defaults applied when a caller omits a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub list_limit: usize,
    pub search_limit: usize,
    pub preview_chars: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// A conversation, possibly cut down to its first turns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub total_turns: usize,
    pub shown_turns: usize,
}

fn resolve_limit(limit: Option<i64>, default: usize, name: &str) -> Result<usize> {
    match limit {
        None => Ok(default),
        Some(n) if n <= 0 => Err(Error::InvalidArgument(format!(
            "{} must be greater than 0 (got {})",
            name, n
        ))),
        Some(n) => Ok(usize::try_from(n).unwrap_or(usize::MAX)),
    }
}

impl ConversationSet {
    /// Most recent conversations first
    pub fn list(&self, limit: Option<i64>, options: &QueryOptions) -> Result<Vec<ConversationSummary>> {
        let limit = resolve_limit(limit, options.list_limit, "limit")?;

        Ok(self
            .conversations()
            .iter()
            .take(limit)
            .map(|c| ConversationSummary::from_conversation(c, options.preview_chars))
            .collect())
    }

    /// Case-insensitive substring search over user and assistant text.
    ///
    /// Hits are ranked by number of matching turns, then recency.
    pub fn search(
        &self,
        query: &str,
        limit: Option<i64>,
        options: &QueryOptions,
    ) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }
        let limit = resolve_limit(limit, options.search_limit, "limit")?;
        let needle = query.to_lowercase();

        let mut hits: Vec<SearchHit> = self
            .conversations()
            .iter()
            .filter_map(|conversation| {
                let matching: Vec<usize> = conversation
                    .turns
                    .iter()
                    .enumerate()
                    .filter(|(_, turn)| {
                        turn.user_text.to_lowercase().contains(&needle)
                            || turn.assistant_text.to_lowercase().contains(&needle)
                    })
                    .map(|(i, _)| i)
                    .collect();

                let first = *matching.first()?;
                Some(SearchHit {
                    conversation: ConversationSummary::from_conversation(
                        conversation,
                        options.preview_chars,
                    ),
                    matching_turns: matching.len(),
                    first_match_turn: first + 1,
                    snippet: preview(&conversation.turns[first].user_text, options.preview_chars),
                })
            })
            .collect();

        // Stable: equal counts keep the set's newest-first order
        hits.sort_by(|a, b| b.matching_turns.cmp(&a.matching_turns));
        hits.truncate(limit);
        Ok(hits)
    }

    pub fn get_detail(&self, id: &str) -> Result<Conversation> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Detail view holding at most `turn_limit` turns from the start
    pub fn get_detail_limited(&self, id: &str, turn_limit: Option<i64>) -> Result<ConversationDetail> {
        let mut conversation = self.get_detail(id)?;
        let total_turns = conversation.turn_count();
        let limit = resolve_limit(turn_limit, total_turns, "turn_limit")?;

        conversation.turns.truncate(limit);
        Ok(ConversationDetail {
            shown_turns: conversation.turn_count(),
            total_turns,
            conversation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None, 20, "limit"), Ok(20));
        assert_eq!(resolve_limit(Some(3), 20, "limit"), Ok(3));
        assert!(matches!(
            resolve_limit(Some(0), 20, "limit"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            resolve_limit(Some(-5), 20, "limit"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
