//! Service metadata relocation
//!
//! The generator leaves `gapic_metadata.json` inside the generated source
//! tree; at runtime the client library expects it on the classpath instead.
//! This moves it into the resources directory, creating that directory if
//! absent.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StagehandError, StagehandResult};
use crate::fsops;

/// Rename the generated metadata JSON from its source-tree path into the
/// resources directory.
///
/// The resources directory is created first, so it exists afterwards even
/// when the rename fails. The file must parse as JSON; a generator that
/// emitted garbage aborts the run here rather than shipping a broken
/// resource.
pub fn relocate_service_metadata(
    repo_root: &Path,
    source: &Path,
    resources_dir: &Path,
) -> StagehandResult<PathBuf> {
    let source_path = repo_root.join(source);
    let resources_path = repo_root.join(resources_dir);

    fs::create_dir_all(&resources_path)?;

    if !source_path.is_file() {
        return Err(StagehandError::MissingOutput { path: source_path });
    }

    let content = fs::read_to_string(&source_path)?;
    serde_json::from_str::<serde_json::Value>(&content).map_err(|e| {
        StagehandError::InvalidMetadata {
            file: source_path.clone(),
            message: e.to_string(),
        }
    })?;

    fsops::relocate_file(&source_path, &resources_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const METADATA: &str = r#"{
  "schema": "1.0",
  "comment": "This file maps proto services/RPCs to the corresponding library clients/methods",
  "language": "java",
  "protoPackage": "google.storage.control.v2",
  "services": {}
}"#;

    #[test]
    fn relocates_metadata_into_resources_dir() {
        let dir = tempdir().unwrap();
        let source_rel = Path::new("lib/src/main/java/stub/gapic_metadata.json");
        let source = dir.path().join(source_rel);
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, METADATA).unwrap();

        let resources_rel = Path::new("lib/src/main/resources");
        let dest =
            relocate_service_metadata(dir.path(), source_rel, resources_rel).unwrap();

        assert_eq!(
            dest,
            dir.path().join("lib/src/main/resources/gapic_metadata.json")
        );
        assert!(dest.exists());
        assert!(!source.exists(), "source path should be empty afterwards");
        assert_eq!(fs::read_to_string(&dest).unwrap(), METADATA);
    }

    #[test]
    fn creates_resources_dir_even_when_source_missing() {
        let dir = tempdir().unwrap();
        let source_rel = Path::new("lib/src/main/java/stub/gapic_metadata.json");
        let resources_rel = Path::new("lib/src/main/resources");

        let err =
            relocate_service_metadata(dir.path(), source_rel, resources_rel).unwrap_err();

        assert!(matches!(err, StagehandError::MissingOutput { .. }));
        assert!(dir.path().join(resources_rel).is_dir());
    }

    #[test]
    fn rejects_metadata_that_is_not_json() {
        let dir = tempdir().unwrap();
        let source_rel = Path::new("gapic_metadata.json");
        fs::write(dir.path().join(source_rel), "not json at all").unwrap();

        let err = relocate_service_metadata(
            dir.path(),
            source_rel,
            Path::new("src/main/resources"),
        )
        .unwrap_err();

        assert!(matches!(err, StagehandError::InvalidMetadata { .. }));
        // The broken file stays where it was.
        assert!(dir.path().join(source_rel).exists());
    }

    #[test]
    fn relocation_is_idempotent_per_run() {
        let dir = tempdir().unwrap();
        let source_rel = Path::new("gapic_metadata.json");
        fs::write(dir.path().join(source_rel), METADATA).unwrap();
        let resources_rel = Path::new("src/main/resources");

        relocate_service_metadata(dir.path(), source_rel, resources_rel).unwrap();

        // A second run has no source file left and reports it as missing.
        let err =
            relocate_service_metadata(dir.path(), source_rel, resources_rel).unwrap_err();
        assert!(matches!(err, StagehandError::MissingOutput { .. }));
    }
}
