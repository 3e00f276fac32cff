//! Shared template application
//!
//! Copies the organization-wide boilerplate set (CI configs, contribution
//! docs) into the repository, skipping an explicit exclusion list. The two
//! synthesis steps use different exclusion lists over the same template
//! source.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;

use crate::error::{StagehandError, StagehandResult};
use crate::fsops;

/// A template source directory plus its compiled exclusion patterns.
#[derive(Debug)]
pub struct TemplateSet {
    source: PathBuf,
    matcher: Gitignore,
}

/// Outcome of a template application pass.
#[derive(Debug, Default)]
pub struct ApplyResult {
    /// Files written (new or with changed content), repo-relative.
    pub written: Vec<PathBuf>,
    /// Files already present with identical content, repo-relative.
    pub unchanged: Vec<PathBuf>,
    /// Template files skipped by the exclusion list, template-relative.
    pub excluded: Vec<PathBuf>,
}

impl TemplateSet {
    /// Compile a template set from a source directory and gitignore-style
    /// exclusion patterns.
    pub fn load(source: &Path, excludes: &[String]) -> StagehandResult<Self> {
        if !source.is_dir() {
            return Err(StagehandError::DirectoryNotFound {
                path: source.to_path_buf(),
            });
        }

        let mut builder = GitignoreBuilder::new(source);
        for pattern in excludes {
            builder
                .add_line(None, pattern)
                .map_err(|e| StagehandError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        let matcher = builder
            .build()
            .map_err(|e| StagehandError::InvalidExcludePattern {
                pattern: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: source.to_path_buf(),
            matcher,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether a template-relative path is on the exclusion list.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.matcher
            .matched_path_or_any_parents(self.source.join(relative), false)
            .is_ignore()
    }

    /// Copy every non-excluded template file into `repo_root`.
    ///
    /// Template files are compared by content hash against the destination,
    /// so files that already match are left alone. Hidden files are
    /// included in the walk and VCS ignore rules do not apply; the template
    /// set is mostly dotfile CI config.
    pub fn apply(&self, repo_root: &Path, dry_run: bool) -> StagehandResult<ApplyResult> {
        let mut result = ApplyResult::default();

        let walker = WalkBuilder::new(&self.source)
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            if !entry.file_type().map_or(false, |t| t.is_file()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.source)
                .map_err(|e| std::io::Error::other(e.to_string()))?
                .to_path_buf();

            if self.is_excluded(&relative) {
                result.excluded.push(relative);
                continue;
            }

            let dest = repo_root.join(&relative);
            let content = fs::read(entry.path())?;

            if dest.is_file() && fsops::hash_file(&dest)? == fsops::hash_content(&content) {
                result.unchanged.push(relative);
                continue;
            }

            if !dry_run {
                fsops::atomic_write(&dest, &content)?;
            }
            result.written.push(relative);
        }

        Ok(result)
    }
}
