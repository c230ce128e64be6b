//! Shared fixture for the CLI integration tests.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixture {
    _temp_dir: TempDir,
    data_dir: PathBuf,
    inputs: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".tracescope");
        let inputs = temp_dir.path().join("inputs");

        fs::create_dir_all(&inputs).expect("Failed to create input dir");

        Self {
            _temp_dir: temp_dir,
            data_dir,
            inputs,
        }
    }

    /// Fixture with `init` already run
    pub fn initialized() -> Self {
        let fixture = Self::new();
        fixture.command().arg("init").assert().success();
        fixture
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    /// Copy `tests/fixtures/<name>` into the input directory and return the copy's path.
    pub fn sample(&self, name: &str) -> PathBuf {
        let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name);
        let dest = self.inputs.join(name);
        fs::copy(&source, &dest)
            .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {}", source.display(), e));
        dest
    }

    pub fn write_input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inputs.join(name);
        fs::write(&path, content).expect("Failed to write input");
        path
    }

    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tracescope");
        cmd.env_remove("TRACESCOPE_LOG")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--format")
            .arg("plain");
        cmd
    }

    pub fn json_command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tracescope");
        cmd.env_remove("TRACESCOPE_LOG")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--format")
            .arg("json");
        cmd
    }

    /// Run with `--format json` and parse stdout
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.json_command().args(args).output().expect("Failed to run");
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }

    pub fn analyze_samples(&self, name: &str) {
        let service = self.sample("service.log");
        let worker = self.sample("worker.txt");
        self.command()
            .arg("analyze")
            .arg(service)
            .arg(worker)
            .arg("--name")
            .arg(name)
            .assert()
            .success();
    }
}
