//! Testing infrastructure for qhistory integration tests.
//!
//! - `fixtures`: payload builders for every on-disk schema variant
//! - `store`: `TestStore`, a real SQLite database laid out like the Q CLI's
//! - `world`: `TestWorld`, an isolated environment for running the binary
//! - `assertions`: checks over the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod store;
pub mod world;

pub use store::TestStore;
pub use world::{CliResult, TestWorld};
