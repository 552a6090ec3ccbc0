use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative recency of a conversation among all retained conversations.
///
/// Derived from the store's row sequence. It is NOT a timestamp: the Q CLI
/// does not persist creation times, and nothing here pretends otherwise.
/// `rank` 0 is the oldest conversation, `population - 1` the newest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EstimatedOrder {
    pub rank: usize,
    pub population: usize,
}

impl EstimatedOrder {
    pub fn new(rank: usize, population: usize) -> Self {
        Self { rank, population }
    }

    /// 1-based position counted from the most recent conversation.
    pub fn recency_position(&self) -> usize {
        self.population.saturating_sub(self.rank)
    }
}

impl fmt::Display for EstimatedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} of {} (order estimate)",
            self.recency_position(),
            self.population
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_is_position_one() {
        let newest = EstimatedOrder::new(4, 5);
        let oldest = EstimatedOrder::new(0, 5);

        assert_eq!(newest.recency_position(), 1);
        assert_eq!(oldest.recency_position(), 5);
        assert_eq!(newest.to_string(), "#1 of 5 (order estimate)");
    }
}
