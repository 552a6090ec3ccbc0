use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use crate::views;
use anyhow::Result;
use serde_json::json;

pub fn handle(ctx: &ExecutionContext, id: &str, output: Option<&str>) -> Result<()> {
    let service = ctx.service()?;

    let Some(output) = output else {
        let markdown = service.export_markdown(id)?;
        return match ctx.format {
            OutputFormat::Json => print_json(&json!({ "id": id, "markdown": markdown })),
            OutputFormat::Plain => {
                print!("{}", markdown);
                Ok(())
            }
        };
    };

    let report = service.export_to_file(id, output)?;
    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => {
            print!("{}", views::render_export_report(&report, &ctx.palette));
            Ok(())
        }
    }
}
