use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use crate::views;
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let service = ctx.service()?;
    let report = service.diagnostics()?;

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => {
            print!("{}", views::render_diagnostics(&report, &ctx.palette));
            Ok(())
        }
    }
}
