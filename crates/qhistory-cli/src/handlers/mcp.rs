use crate::commands::ExecutionContext;
use crate::mcp;
use anyhow::Result;
use qhistory_runtime::HistoryService;

pub fn handle_serve(ctx: &ExecutionContext) -> Result<()> {
    // A missing database is reported per tool call, not at startup
    let service = HistoryService::from_config_deferred(&ctx.config, ctx.db.as_deref())?;
    mcp::run_server(service)
}
