use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use crate::views;
use anyhow::Result;
use serde_json::json;

pub fn handle(ctx: &ExecutionContext, query: &str, limit: Option<i64>) -> Result<()> {
    let service = ctx.service()?;
    let hits = service.search(query, limit)?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "query": query, "hits": hits })),
        OutputFormat::Plain => {
            print!("{}", views::render_search(query, &hits, &ctx.palette));
            Ok(())
        }
    }
}
