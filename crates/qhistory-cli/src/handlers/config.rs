use crate::commands::ExecutionContext;
use crate::handlers::print_json;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use qhistory_runtime::resolve_store_path;
use serde_json::json;

pub fn handle_init(ctx: &ExecutionContext, force: bool) -> Result<()> {
    let path = &ctx.config_path;
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    ctx.config
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "path": path })),
        OutputFormat::Plain => {
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

pub fn handle_show(ctx: &ExecutionContext) -> Result<()> {
    let store_path = resolve_store_path(ctx.db.as_deref(), &ctx.config)?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "config_path": ctx.config_path,
            "config_exists": ctx.config_path.exists(),
            "store_path": store_path,
            "config": ctx.config,
        })),
        OutputFormat::Plain => {
            let source = if ctx.config_path.exists() {
                ""
            } else {
                " (not found, using defaults)"
            };
            println!("# config file: {}{}", ctx.config_path.display(), source);
            println!("# database:    {}", store_path.display());
            print!("{}", toml::to_string_pretty(&ctx.config)?);
            Ok(())
        }
    }
}
