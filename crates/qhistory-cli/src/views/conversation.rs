use qhistory_runtime::{ConversationDetail, ConversationSummary, ExportReport, SearchHit};
use qhistory_types::is_blank;

use super::Palette;

fn summary_lines(out: &mut String, summary: &ConversationSummary, palette: &Palette) {
    out.push_str(&format!(
        "{}  {}  {} turns  [{}]\n",
        palette.id(&summary.id),
        palette.dim(&summary.recency),
        summary.turn_count,
        summary.schema_variant
    ));
    out.push_str(&format!("    {}\n", palette.dim(&summary.workspace)));
    if !summary.preview.is_empty() {
        out.push_str(&format!("    {}\n", summary.preview));
    }
}

pub fn render_list(summaries: &[ConversationSummary], palette: &Palette) -> String {
    if summaries.is_empty() {
        return "No conversations found.\n".to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        summary_lines(&mut out, summary, palette);
    }
    out
}

pub fn render_search(query: &str, hits: &[SearchHit], palette: &Palette) -> String {
    if hits.is_empty() {
        return format!("No conversations match \"{}\".\n", query);
    }

    let mut out = format!(
        "{}\n",
        palette.heading(&format!("{} conversation(s) match \"{}\"", hits.len(), query))
    );
    for hit in hits {
        out.push('\n');
        summary_lines(&mut out, &hit.conversation, palette);
        out.push_str(&format!(
            "    {} matching turn(s), first at turn {}: {}\n",
            hit.matching_turns, hit.first_match_turn, hit.snippet
        ));
    }
    out
}

pub fn render_detail(detail: &ConversationDetail, palette: &Palette) -> String {
    let conversation = &detail.conversation;
    let mut out = format!(
        "{} {}\n",
        palette.heading("Conversation"),
        palette.id(&conversation.id)
    );
    out.push_str(&format!("Workspace: {}\n", conversation.workspace));
    out.push_str(&format!("Order:     {}\n", conversation.estimated_order));
    out.push_str(&format!("Schema:    {}\n", conversation.schema_variant));
    out.push_str(&format!("Agent:     {}\n", conversation.agent));
    if detail.shown_turns < detail.total_turns {
        out.push_str(&format!(
            "Turns:     {} of {}\n",
            detail.shown_turns, detail.total_turns
        ));
    } else {
        out.push_str(&format!("Turns:     {}\n", detail.total_turns));
    }

    for (i, turn) in conversation.turns.iter().enumerate() {
        out.push_str(&format!("\n{}\n", palette.heading(&format!("── Turn {} ──", i + 1))));
        out.push_str(&format!("{} {}\n", palette.ok("User:"), turn.user_text));
        let answer = if is_blank(&turn.assistant_text) {
            palette.dim("(no response recorded)")
        } else {
            turn.assistant_text.clone()
        };
        out.push_str(&format!("{} {}\n", palette.ok("Assistant:"), answer));
    }
    out
}

pub fn render_export_report(report: &ExportReport, palette: &Palette) -> String {
    format!(
        "Exported {} to {} ({} bytes)\n",
        palette.id(&report.id),
        report.path.display(),
        report.bytes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhistory_types::{EstimatedOrder, SchemaVariant};

    fn summary() -> ConversationSummary {
        ConversationSummary {
            id: "conv-1".to_string(),
            workspace: "/home/dev/app".to_string(),
            schema_variant: SchemaVariant::ObjectTurn,
            agent: "unknown".to_string(),
            turn_count: 3,
            preview: "show me git status".to_string(),
            estimated_order: EstimatedOrder::new(1, 2),
            recency: "#1 of 2 (order estimate)".to_string(),
        }
    }

    #[test]
    fn test_list_rendering() {
        let rendered = render_list(&[summary()], &Palette::plain());
        assert_eq!(
            rendered,
            "conv-1  #1 of 2 (order estimate)  3 turns  [object_turn]\n    /home/dev/app\n    show me git status\n"
        );
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(render_list(&[], &Palette::plain()), "No conversations found.\n");
        assert_eq!(
            render_search("k8s", &[], &Palette::plain()),
            "No conversations match \"k8s\".\n"
        );
    }
}
