//! Common test utilities for Stagehand CLI tests.
//!
//! Provides `TestEnv`, an isolated repository root in a temp directory with
//! helpers to seed staging trees and templates and to run the stagehand
//! binary against it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a stagehand CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse the last JSON event line from stdout.
    pub fn last_json_event(&self) -> serde_json::Value {
        let line = self
            .stdout
            .lines()
            .rev()
            .find(|l| l.trim_start().starts_with('{'))
            .unwrap_or_else(|| panic!("no JSON event in stdout:\n{}", self.stdout));
        serde_json::from_str(line).expect("JSON event should parse")
    }
}

/// Isolated repository root for driving the CLI.
pub struct TestEnv {
    pub repo_root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            repo_root: TempDir::new().expect("create temp repo"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_stagehand")),
        }
    }

    /// Path relative to the repository root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.repo_root.path().join(relative)
    }

    /// Write a file under the repository root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Seed a staged library under `<root>/<version>/<name>` with one
    /// generated source file.
    pub fn stage_library(&self, root: &str, version: &str, name: &str) -> PathBuf {
        let lib = format!("{root}/{version}/{name}");
        self.write(
            &format!("{lib}/src/main/java/Client.java"),
            "class Client {}",
        );
        self.path(&lib)
    }

    /// Seed a minimal shared template tree.
    pub fn seed_templates(&self, source: &str) {
        self.write(&format!("{source}/.kokoro/common.cfg"), "common");
        self.write(
            &format!("{source}/.kokoro/presubmit/integration.cfg"),
            "integration",
        );
        self.write(&format!("{source}/samples/pom.xml"), "<project/>");
        self.write(&format!("{source}/CONTRIBUTING.md"), "contributing");
        self.write(&format!("{source}/README.md"), "readme");
        self.write(&format!("{source}/renovate.json"), "{}");
    }

    /// Write an executable fake-generator script and return its path.
    #[cfg(unix)]
    pub fn write_script(&self, relative: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write(relative, content);
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    /// Run stagehand from the repository root.
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run stagehand from the repository root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.repo_root.path()).args(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute stagehand");
        output_to_result(output)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Assert a path exists under the repo root.
#[macro_export]
macro_rules! assert_repo_path {
    ($env:expr, $path:expr) => {
        assert!(
            $env.exists($path),
            "expected '{}' to exist under repo root",
            $path
        );
    };
}

/// Assert a path does not exist under the repo root.
#[macro_export]
macro_rules! assert_no_repo_path {
    ($env:expr, $path:expr) => {
        assert!(
            !$env.exists($path),
            "expected '{}' to be absent under repo root",
            $path
        );
    };
}
