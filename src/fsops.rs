//! Filesystem primitives
//!
//! Small, synchronous helpers shared by the staging, template, and metadata
//! modules. Failures propagate as-is; callers do not retry.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::StagehandResult;

/// Remove a file if it exists.
///
/// Returns `true` when a file was actually removed. A missing path is not
/// an error.
pub fn remove_file_if_exists(path: &Path) -> StagehandResult<bool> {
    if path.is_file() {
        fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Move a directory to `dest`, merging into an existing destination.
///
/// Uses a plain rename when the destination does not exist yet. When it
/// does (or the rename fails, e.g. across filesystems), entries are moved
/// one by one; files at the destination are overwritten. The source
/// directory is gone afterwards.
pub fn move_dir_merge(src: &Path, dest: &Path) -> StagehandResult<()> {
    if !dest.exists() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(src, dest).is_ok() {
            return Ok(());
        }
    }

    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            move_dir_merge(&entry.path(), &target)?;
        } else {
            move_file(&entry.path(), &target)?;
        }
    }
    fs::remove_dir(src)?;
    Ok(())
}

/// Move a single file, overwriting the destination.
///
/// Falls back to copy + remove when rename is not possible.
pub fn move_file(src: &Path, dest: &Path) -> StagehandResult<()> {
    if dest.is_file() {
        fs::remove_file(dest)?;
    }
    if fs::rename(src, dest).is_err() {
        fs::copy(src, dest)?;
        fs::remove_file(src)?;
    }
    Ok(())
}

/// Rename a file into a directory, creating the directory if absent.
///
/// Returns the destination path. The directory is created before the file
/// is touched, so it exists even when the rename subsequently fails.
pub fn relocate_file(src: &Path, dest_dir: &Path) -> StagehandResult<PathBuf> {
    fs::create_dir_all(dest_dir)?;
    let file_name = src.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a file path: {}", src.display()),
        )
    })?;
    let dest = dest_dir.join(file_name);
    move_file(src, &dest)?;
    Ok(dest)
}

/// Write content to a file atomically.
///
/// Uses the tempfile + persist pattern so readers never observe a partial
/// file. Parent directories are created as needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> StagehandResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Compute the SHA-256 hash of a byte slice, `sha256:`-prefixed.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Compute the SHA-256 hash of a file's content.
pub fn hash_file(path: &Path) -> StagehandResult<String> {
    let content = fs::read(path)?;
    Ok(hash_content(&content))
}
