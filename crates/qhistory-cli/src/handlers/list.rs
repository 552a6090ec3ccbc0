use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use crate::views;
use anyhow::Result;
use serde_json::json;

pub fn handle(ctx: &ExecutionContext, limit: Option<i64>) -> Result<()> {
    let service = ctx.service()?;
    let summaries = service.list(limit)?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "conversations": summaries })),
        OutputFormat::Plain => {
            print!("{}", views::render_list(&summaries, &ctx.palette));
            Ok(())
        }
    }
}
