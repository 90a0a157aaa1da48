use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness that runs the binary inside an empty scratch directory, so a
/// stray `cadence.toml` or `CADENCE_*` variable cannot leak into a test.
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("CADENCE_MAX_OCCURRENCES")
            .env_remove("CADENCE_HORIZON_DAYS")
            .env_remove("CADENCE_DATE_FORMAT")
            .env_remove("CADENCE_TIME_FORMAT");
        cmd
    }

    /// Writes `cadence.toml` into the scratch directory and returns its path.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir().join("cadence.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command that prints JSON and parses its stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_success(args).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("stdout is valid JSON")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Mon/Wed practice through January, as a stored rule string
    pub fn weekly_rule() -> &'static str {
        "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE;UNTIL=2025-01-31"
    }

    /// A legacy metadata blob with loosely typed fields
    pub fn legacy_metadata() -> &'static str {
        r#"{"freq": "Weekly", "interval": "2", "days": ["friday", "mon", "xx"], "occurrences": 4}"#
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use super::*;

    /// Predicate to check if output contains the preview table headers
    pub fn has_preview_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date")
            .and(predicate::str::contains("Day"))
            .and(predicate::str::contains("Time"))
    }

    /// Predicate to check if stderr carries a formatted error
    pub fn is_error_message() -> impl Predicate<str> {
        predicate::str::contains("Error:")
    }
}
