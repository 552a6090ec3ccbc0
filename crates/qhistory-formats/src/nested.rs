use qhistory_types::{Turn, is_blank};
use serde::Deserialize;
use serde_json::Value;

use crate::detect::NestedSource;
use crate::normalize::Normalized;
use crate::schema::{MessageRole, NestedConversation, NestedMessage, NestedTab};

/// Normalize a nested-collection payload.
///
/// Only the first conversation yielding a turn with user text is read.
/// Remaining siblings with turns are reported at debug level and otherwise
/// ignored.
pub(crate) fn normalize(workspace: &str, sources: &[NestedSource<'_>]) -> Normalized {
    let mut chosen: Option<(NestedConversation, Option<&Value>, Vec<Turn>)> = None;
    let mut ignored = 0usize;

    for source in sources {
        let conversation = match NestedConversation::deserialize(source.conversation) {
            Ok(conversation) => conversation,
            Err(e) => {
                tracing::debug!(workspace, error = %e, "skipping unreadable nested conversation");
                continue;
            }
        };
        let turns = pair_messages(&conversation.messages);
        if turns.iter().all(|turn| is_blank(&turn.user_text)) {
            continue;
        }
        if chosen.is_some() {
            ignored += 1;
        } else {
            chosen = Some((conversation, source.tab, turns));
        }
    }

    if ignored > 0 {
        tracing::debug!(
            workspace,
            ignored,
            "nested record holds several conversations, using the first"
        );
    }

    let Some((conversation, tab, turns)) = chosen else {
        return Normalized::default();
    };

    let declared_id = conversation.conversation_id.clone().or_else(|| {
        tab.and_then(|tab| NestedTab::deserialize(tab).ok())
            .and_then(|tab| tab.history_id)
    });

    Normalized {
        declared_id,
        turns,
    }
}

/// Pair each prompt with the answer that immediately follows it
fn pair_messages(messages: &[Value]) -> Vec<Turn> {
    let mut turns = Vec::new();
    let mut pending: Option<String> = None;

    for raw in messages {
        let Ok(message) = NestedMessage::deserialize(raw) else {
            continue;
        };
        match message.role() {
            MessageRole::Prompt => {
                if let Some(prompt) = pending.take() {
                    turns.push(Turn::new(prompt, ""));
                }
                pending = Some(message.body.unwrap_or_default());
            }
            MessageRole::Answer => match pending.take() {
                Some(prompt) => turns.push(Turn::new(prompt, message.body.unwrap_or_default())),
                None => tracing::debug!("skipping answer without a preceding prompt"),
            },
            MessageRole::Other => {}
        }
    }

    if let Some(prompt) = pending {
        turns.push(Turn::new(prompt, ""));
    }

    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(turns: &[Turn]) -> Vec<(&str, &str)> {
        turns
            .iter()
            .map(|t| (t.user_text.as_str(), t.assistant_text.as_str()))
            .collect()
    }

    #[test]
    fn test_pairs_prompt_with_following_answer() {
        let messages = vec![
            json!({"type": "prompt", "body": "deploy to k8s"}),
            json!({"type": "answer", "body": "Here's how..."}),
        ];
        assert_eq!(
            texts(&pair_messages(&messages)),
            vec![("deploy to k8s", "Here's how...")]
        );
    }

    #[test]
    fn test_unanswered_prompts_keep_empty_answer() {
        let messages = vec![
            json!({"type": "prompt", "body": "first"}),
            json!({"type": "prompt", "body": "second"}),
            json!({"type": "answer", "body": "reply"}),
            json!({"type": "prompt", "body": "last"}),
        ];
        assert_eq!(
            texts(&pair_messages(&messages)),
            vec![("first", ""), ("second", "reply"), ("last", "")]
        );
    }

    #[test]
    fn test_orphan_answers_and_other_types_are_skipped() {
        let messages = vec![
            json!({"type": "answer", "body": "orphan"}),
            json!({"type": "system", "body": "ignored"}),
            json!("not an object"),
            json!({"type": "Prompt", "body": "q"}),
            json!({"type": "ANSWER", "body": "a"}),
        ];
        assert_eq!(texts(&pair_messages(&messages)), vec![("q", "a")]);
    }

    #[test]
    fn test_first_non_empty_conversation_wins() {
        let tab = json!({"historyId": "tab-1"});
        let empty = json!({"conversationId": "c-0", "messages": []});
        let first = json!({
            "messages": [{"type": "prompt", "body": "one"}]
        });
        let second = json!({
            "conversationId": "c-2",
            "messages": [{"type": "prompt", "body": "two"}]
        });
        let sources = vec![
            NestedSource { conversation: &empty, tab: Some(&tab) },
            NestedSource { conversation: &first, tab: Some(&tab) },
            NestedSource { conversation: &second, tab: Some(&tab) },
        ];

        let normalized = normalize("/ws", &sources);
        assert_eq!(normalized.declared_id.as_deref(), Some("tab-1"));
        assert_eq!(texts(&normalized.turns), vec![("one", "")]);
    }

    #[test]
    fn test_conversation_without_prompts_is_passed_over() {
        let system_only = json!({
            "conversationId": "c-1",
            "messages": [{"type": "system", "body": "boot"}, {"type": "answer", "body": "stray"}]
        });
        let blank_prompt = json!({
            "conversationId": "c-2",
            "messages": [{"type": "prompt", "body": "   "}]
        });
        let real = json!({
            "conversationId": "c-3",
            "messages": [
                {"type": "prompt", "body": "deploy to k8s"},
                {"type": "answer", "body": "ok"}
            ]
        });
        let sources = vec![
            NestedSource { conversation: &system_only, tab: None },
            NestedSource { conversation: &blank_prompt, tab: None },
            NestedSource { conversation: &real, tab: None },
        ];

        let normalized = normalize("/ws", &sources);
        assert_eq!(normalized.declared_id.as_deref(), Some("c-3"));
        assert_eq!(texts(&normalized.turns), vec![("deploy to k8s", "ok")]);
    }

    #[test]
    fn test_no_messages_yields_nothing() {
        let empty = json!({"messages": []});
        let sources = vec![NestedSource { conversation: &empty, tab: None }];

        let normalized = normalize("/ws", &sources);
        assert!(normalized.declared_id.is_none());
        assert!(normalized.turns.is_empty());
    }
}
