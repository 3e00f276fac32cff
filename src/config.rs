//! Synthesis configuration
//!
//! Loaded from `stagehand.toml` at the repository root. Every field has a
//! default, so a repository without a config file still post-processes with
//! the stock layout. Unknown keys are surfaced as warnings rather than
//! errors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StagehandError, StagehandResult};

/// Name of the config file looked up under the repository root.
pub const CONFIG_FILE: &str = "stagehand.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub staging: StagingConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub postprocess: PostprocessConfig,

    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Staging area layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory populated by the external generator, relative to the repo
    /// root.
    #[serde(default = "default_staging_root")]
    pub root: PathBuf,

    /// File names deleted from a staging library before it is moved, when
    /// present. The generator sometimes emits these alongside the sources.
    #[serde(default = "default_stray_files")]
    pub stray_files: Vec<String>,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: default_staging_root(),
            stray_files: default_stray_files(),
        }
    }
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("owl-bot-staging")
}

fn default_stray_files() -> Vec<String> {
    vec![".repo-metadata.json".to_string()]
}

/// Shared template set location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Template source directory, relative to the repo root unless absolute.
    #[serde(default = "default_templates_source")]
    pub source: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            source: default_templates_source(),
        }
    }
}

fn default_templates_source() -> PathBuf {
    PathBuf::from("synth-templates")
}

/// Settings for the staging post-processing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostprocessConfig {
    /// Template paths never copied into the repository.
    #[serde(default = "default_postprocess_excludes")]
    pub excludes: Vec<String>,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            excludes: default_postprocess_excludes(),
        }
    }
}

fn default_postprocess_excludes() -> Vec<String> {
    [
        ".gitignore",
        ".kokoro/presubmit/integration.cfg",
        ".kokoro/presubmit/graalvm-native.cfg",
        ".kokoro/nightly/integration.cfg",
        ".kokoro/nightly/java11-integration.cfg",
        "samples/*",
        "codecov.yaml",
        "renovate.json",
        "README.md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Settings for the generation-invocation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Protobuf service name handed to the generator.
    #[serde(default = "default_service")]
    pub service: String,

    /// Service version identifier.
    #[serde(default = "default_version")]
    pub version: String,

    /// Path of the proto package within the proto repository.
    #[serde(default = "default_proto_path")]
    pub proto_path: String,

    /// Build target identifier handed to the generator.
    #[serde(default = "default_bazel_target")]
    pub bazel_target: String,

    /// Generator command invoked to build the client library.
    #[serde(default = "default_generator_command")]
    pub command: String,

    /// Directory the generator is expected to have populated, relative to
    /// the repo root.
    #[serde(default = "default_expected_output")]
    pub expected_output: PathBuf,

    /// Template paths never copied into the repository. This list differs
    /// from the postprocess one.
    #[serde(default = "default_generate_excludes")]
    pub excludes: Vec<String>,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            version: default_version(),
            proto_path: default_proto_path(),
            bazel_target: default_bazel_target(),
            command: default_generator_command(),
            expected_output: default_expected_output(),
            excludes: default_generate_excludes(),
            metadata: MetadataConfig::default(),
        }
    }
}

fn default_service() -> String {
    "storage-control".to_string()
}

fn default_version() -> String {
    "v2".to_string()
}

fn default_proto_path() -> String {
    "google/storage/control/v2".to_string()
}

fn default_bazel_target() -> String {
    "//google/storage/control/v2:google-cloud-storage-control-v2-java".to_string()
}

fn default_generator_command() -> String {
    "bazelisk".to_string()
}

fn default_expected_output() -> PathBuf {
    PathBuf::from("google-cloud-storage-control")
}

fn default_generate_excludes() -> Vec<String> {
    [
        ".gitignore",
        ".kokoro/*",
        "samples/*",
        "README.md",
        "renovate.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Relocation of the generated service metadata file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Where the generator leaves the metadata JSON, relative to the repo
    /// root.
    #[serde(default = "default_metadata_source")]
    pub source: PathBuf,

    /// Resources directory the file is renamed into, relative to the repo
    /// root. Created if absent.
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            source: default_metadata_source(),
            resources_dir: default_resources_dir(),
        }
    }
}

fn default_metadata_source() -> PathBuf {
    PathBuf::from(
        "google-cloud-storage-control/src/main/java/com/google/storage/control/v2/stub/gapic_metadata.json",
    )
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("google-cloud-storage-control/src/main/resources")
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> StagehandResult<Self> {
        let (config, _) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys).
    pub fn load_with_warnings(path: &Path) -> StagehandResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Config = serde_ignored::deserialize(deserializer, |p| {
            unknown_paths.push(p.to_string());
        })
        .map_err(|e| StagehandError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|key| ConfigWarning {
                key,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load from `stagehand.toml` under the repo root, or fall back to
    /// defaults. Environment overrides apply either way.
    pub fn load_or_default(repo_root: &Path) -> StagehandResult<(Self, Vec<ConfigWarning>)> {
        let path = repo_root.join(CONFIG_FILE);
        let (config, warnings) = if path.exists() {
            Self::load_with_warnings(&path)?
        } else {
            (Self::default(), Vec::new())
        };
        Ok((with_env_overrides(config), warnings))
    }
}

/// Apply environment variable overrides (STAGEHAND_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Ok(command) = std::env::var("STAGEHAND_GENERATOR") {
        if !command.is_empty() {
            config.generate.command = command;
        }
    }

    if let Ok(root) = std::env::var("STAGEHAND_STAGING_ROOT") {
        if !root.is_empty() {
            config.staging.root = PathBuf::from(root);
        }
    }

    if let Ok(source) = std::env::var("STAGEHAND_TEMPLATES") {
        if !source.is_empty() {
            config.templates.source = PathBuf::from(source);
        }
    }

    config
}
