use qhistory_runtime::Diagnostics;

use super::Palette;

pub fn render_diagnostics(report: &Diagnostics, palette: &Palette) -> String {
    let stats = &report.stats;
    let mut out = format!("{}\n", palette.heading("qhistory doctor"));

    out.push_str(&format!("Store:          {}\n", report.store));
    out.push_str(&format!("Records:        {}\n", stats.record_count));
    out.push_str(&format!("Conversations:  {}\n", stats.conversation_count));
    out.push_str(&format!("Turns:          {}\n", stats.turn_count));
    out.push_str(&format!("Empty:          {}\n", stats.empty_count));
    out.push_str(&format!(
        "Snapshot:       generation {}, built {} in {} ms\n",
        report.generation,
        report.built_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.build_millis
    ));

    out.push_str(&format!("\n{}\n", palette.heading("Schema variants")));
    for (variant, count) in &stats.variant_counts {
        out.push_str(&format!("  {:<18} {}\n", variant.as_str(), count));
    }

    let (empty, broken): (Vec<_>, Vec<_>) =
        stats.malformed.iter().partition(|m| m.reason.is_benign());

    out.push('\n');
    if broken.is_empty() {
        out.push_str(&format!("{}\n", palette.ok("No malformed records")));
    } else {
        out.push_str(&format!(
            "{}\n",
            palette.warn(&format!("{} malformed record(s)", broken.len()))
        ));
        for record in &broken {
            out.push_str(&format!("  {}\n", record));
        }
    }
    if !empty.is_empty() {
        out.push_str(&format!(
            "{}\n",
            palette.dim(&format!("{} record(s) with no history yet", empty.len()))
        ));
    }

    out
}
