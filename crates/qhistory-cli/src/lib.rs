// NOTE: qhistory Architecture Rationale
//
// Why read-only (never write to the Q CLI database)?
// - The Q CLI owns data.sqlite3 and may be writing to it while we read
// - A read-only connection cannot corrupt it or take write locks
// - Trade-off: no bookmarks or tags, everything is derived on each rebuild
//
// Why schema-on-read with a closed set of variants?
// - The Q CLI changed its persistence shape several times without migrating old rows
// - Each record is classified on read, so one database can mix all layouts
// - A record matching no layout is reported by `doctor` and skipped, never fatal
//
// Why an order estimate instead of timestamps?
// - Records carry no creation time; rowid order is the only recency signal
// - Every rendering labels it as an estimate so nobody mistakes it for a date

mod args;
mod commands;
mod handlers;
mod logging;
mod mcp;
mod types;
mod views;

pub use args::{Cli, Commands, ConfigCommand, McpCommand};
pub use commands::run;
pub use types::{LogLevel, OutputFormat};
