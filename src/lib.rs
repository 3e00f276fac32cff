//! Stagehand - client library synthesis runner and staging post-processor
//!
//! Stagehand wires an external code generator into a client-library
//! repository: it detaches generator output from the staging area into its
//! final locations, applies the shared repository templates with per-step
//! exclusion lists, and performs the file relocations the generated layout
//! needs (stray metadata cleanup, moving `gapic_metadata.json` into the
//! resources directory).

pub mod config;
pub mod error;
pub mod fsops;
pub mod generator;
pub mod metadata;
pub mod staging;
pub mod templates;

// Re-exports for convenience
pub use config::{Config, ConfigWarning, GenerateConfig, StagingConfig};
pub use error::{StagehandError, StagehandResult};
pub use generator::{BazelGenerator, ClientGenerator, GeneratorRequest};
pub use metadata::relocate_service_metadata;
pub use staging::{DetachResult, StagingArea, StagingLibrary};
pub use templates::{ApplyResult, TemplateSet};
