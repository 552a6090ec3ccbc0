use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use crate::views;
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, id: &str, turns: Option<i64>) -> Result<()> {
    let service = ctx.service()?;
    let detail = service.get_detail_limited(id, turns)?;

    match ctx.format {
        OutputFormat::Json => print_json(&detail),
        OutputFormat::Plain => {
            print!("{}", views::render_detail(&detail, &ctx.palette));
            Ok(())
        }
    }
}
