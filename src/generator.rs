//! External generator invocation
//!
//! The client library itself is produced by an external code generator;
//! this module only shells out to it. A non-zero exit aborts the run with
//! no retry.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::GenerateConfig;
use crate::error::{StagehandError, StagehandResult};

/// What the generator is asked to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    /// Protobuf service name (e.g. "storage-control").
    pub service: String,
    /// Service version identifier (e.g. "v2").
    pub version: String,
    /// Proto package path within the proto repository.
    pub proto_path: String,
    /// Build target identifier handed to the generator.
    pub bazel_target: String,
}

impl GeneratorRequest {
    pub fn from_config(config: &GenerateConfig) -> Self {
        Self {
            service: config.service.clone(),
            version: config.version.clone(),
            proto_path: config.proto_path.clone(),
            bazel_target: config.bazel_target.clone(),
        }
    }

    /// Command-line arguments for the build invocation.
    pub fn args(&self) -> Vec<String> {
        vec!["build".to_string(), self.bazel_target.clone()]
    }
}

/// Seam for the external generator, so command construction can be tested
/// and the tool substituted.
pub trait ClientGenerator {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Run the generator from the repository root.
    fn generate(&self, repo_root: &Path, request: &GeneratorRequest) -> StagehandResult<()>;
}

/// Generator backed by a Bazel-compatible command (`bazelisk` by default).
pub struct BazelGenerator {
    command: String,
    quiet: bool,
}

impl BazelGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            quiet: false,
        }
    }

    /// Suppress generator stdout (JSON output mode keeps stdout machine
    /// readable).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl ClientGenerator for BazelGenerator {
    fn name(&self) -> &'static str {
        "bazel"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn generate(&self, repo_root: &Path, request: &GeneratorRequest) -> StagehandResult<()> {
        let mut cmd = Command::new(&self.command);
        cmd.args(request.args()).current_dir(repo_root);

        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let status = cmd
            .status()
            .map_err(|_| StagehandError::GeneratorUnavailable {
                command: self.command.clone(),
            })?;

        if !status.success() {
            return Err(StagehandError::GeneratorFailed {
                target: request.bazel_target.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
