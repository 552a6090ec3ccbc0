pub mod config;
pub mod doctor;
pub mod export;
pub mod list;
pub mod mcp;
pub mod search;
pub mod show;

use anyhow::Result;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
