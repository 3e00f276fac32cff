//! Staging area handling
//!
//! The external generator drops each client library under
//! `<staging-root>/<version>/<library>/`. Detaching moves every library to
//! its final location at the repository root, strips known stray files
//! first, and removes the staging tree afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StagehandResult;
use crate::fsops;

/// Handle onto a staging root directory.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

/// One generated library waiting in the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLibrary {
    /// Version segment the library was staged under (e.g. "v2").
    pub version: String,
    /// Library directory name; also its destination name at the repo root.
    pub name: String,
    /// Absolute path of the staged directory.
    pub path: PathBuf,
}

/// Outcome of detaching the staging area.
#[derive(Debug, Default)]
pub struct DetachResult {
    /// (library name, destination path) per moved library.
    pub moved: Vec<(String, PathBuf)>,
    /// Stray files deleted before moving.
    pub stray_removed: Vec<PathBuf>,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate staged libraries, sorted by version then name.
    ///
    /// A missing staging root yields an empty list: a repository with
    /// nothing staged still gets its templates applied.
    pub fn libraries(&self) -> StagehandResult<Vec<StagingLibrary>> {
        let mut libraries = Vec::new();
        if !self.root.is_dir() {
            return Ok(libraries);
        }

        for version_entry in sorted_dirs(&self.root)? {
            let version = version_entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for library_entry in sorted_dirs(&version_entry)? {
                let name = library_entry
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                libraries.push(StagingLibrary {
                    version: version.clone(),
                    name,
                    path: library_entry,
                });
            }
        }

        Ok(libraries)
    }

    /// Move every staged library into the repository and drop the staging
    /// tree.
    ///
    /// Per library: delete each listed stray file if present, then move the
    /// directory to `repo_root/<name>`, merging into any existing checkout
    /// of the same library. Once all libraries are out, the staging root is
    /// removed entirely. Dry run only reports the plan.
    pub fn detach(
        &self,
        repo_root: &Path,
        stray_files: &[String],
        dry_run: bool,
    ) -> StagehandResult<DetachResult> {
        let mut result = DetachResult::default();

        for library in self.libraries()? {
            for stray in stray_files {
                let stray_path = library.path.join(stray);
                if dry_run {
                    if stray_path.is_file() {
                        result.stray_removed.push(stray_path);
                    }
                } else if fsops::remove_file_if_exists(&stray_path)? {
                    result.stray_removed.push(stray_path);
                }
            }

            let dest = repo_root.join(&library.name);
            if !dry_run {
                fsops::move_dir_merge(&library.path, &dest)?;
            }
            result.moved.push((library.name, dest));
        }

        if !dry_run && self.root.is_dir() {
            fs::remove_dir_all(&self.root)?;
        }

        Ok(result)
    }
}

fn sorted_dirs(path: &Path) -> StagehandResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
