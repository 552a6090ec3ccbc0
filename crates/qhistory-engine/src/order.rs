use qhistory_types::{Conversation, EstimatedOrder};

/// Rank conversations by store sequence and sort them newest first.
///
/// Rank 0 is the lowest sequence; ties are broken by workspace key. The
/// population is the number of conversations passed in.
pub fn assign_estimated_order(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| {
        a.store_sequence
            .cmp(&b.store_sequence)
            .then_with(|| a.workspace.cmp(&b.workspace))
    });

    let population = conversations.len();
    for (rank, conversation) in conversations.iter_mut().enumerate() {
        conversation.estimated_order = EstimatedOrder::new(rank, population);
    }

    conversations.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhistory_types::{SchemaVariant, Turn};

    fn conversation(workspace: &str, sequence: i64) -> Conversation {
        Conversation::new(
            workspace,
            workspace,
            sequence,
            SchemaVariant::ObjectTurn,
            vec![Turn::new("hi", "")],
        )
    }

    #[test]
    fn test_newest_first_with_dense_ranks() {
        let mut conversations = vec![
            conversation("/b", 10),
            conversation("/a", 3),
            conversation("/c", 42),
        ];

        assign_estimated_order(&mut conversations);

        let order: Vec<_> = conversations
            .iter()
            .map(|c| (c.workspace.as_str(), c.estimated_order.rank))
            .collect();
        assert_eq!(order, vec![("/c", 2), ("/b", 1), ("/a", 0)]);
        assert!(conversations.iter().all(|c| c.estimated_order.population == 3));
    }

    #[test]
    fn test_ties_break_on_workspace() {
        let mut conversations = vec![conversation("/z", 1), conversation("/a", 1)];

        assign_estimated_order(&mut conversations);

        assert_eq!(conversations[0].workspace, "/z");
        assert_eq!(conversations[0].estimated_order.rank, 1);
        assert_eq!(conversations[1].workspace, "/a");
        assert_eq!(conversations[1].estimated_order.rank, 0);
    }
}
