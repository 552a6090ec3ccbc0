//! Isolated environment for running the `qhistory` binary.

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};

use crate::store::TestStore;

/// Test environment: a database plus a config file path nobody else uses.
///
/// # Example
/// ```ignore
/// use assert_cmd::cargo::cargo_bin_cmd;
/// use qhistory_testing::TestWorld;
///
/// let world = TestWorld::with_samples().unwrap();
/// let mut cmd = cargo_bin_cmd!("qhistory");
/// let result = world.run(&mut cmd, &["list"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    store: TestStore,
    config_path: PathBuf,
}

impl TestWorld {
    /// Empty database
    pub fn new() -> Result<Self> {
        Self::from_store(TestStore::new()?)
    }

    /// Database holding `fixtures::sample_bodies`
    pub fn with_samples() -> Result<Self> {
        Self::from_store(TestStore::with_samples()?)
    }

    fn from_store(store: TestStore) -> Result<Self> {
        let config_path = store.dir().join("config").join("config.toml");
        Ok(Self { store, config_path })
    }

    pub fn store(&self) -> &TestStore {
        &self.store
    }

    pub fn db_path(&self) -> &Path {
        self.store.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Scratch directory for export targets and the like
    pub fn temp_dir(&self) -> &Path {
        self.store.dir()
    }

    /// Point a command at this environment's database and config file.
    ///
    /// The caller provides the base command (from `cargo_bin_cmd!("qhistory")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--db")
            .arg(self.db_path())
            .arg("--config")
            .arg(&self.config_path)
            .env_remove("RUST_LOG")
            .current_dir(self.store.dir())
    }

    /// Configure, add `args`, run, and capture the output
    pub fn run(&self, cmd: &mut Command, args: &[&str]) -> Result<CliResult> {
        self.configure_command(cmd);
        cmd.args(args);

        let output = cmd.output()?;
        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }
}
