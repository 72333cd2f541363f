//! Cache path resolution
//!
//! Maps caller-supplied relative paths onto the cache root. Paths are
//! cleaned lexically, so `vendor/./bundle` and `vendor/x/../bundle` name the
//! same entry, and anything that would land outside the root is rejected.

use crate::error::{is_absent, CacheError, CacheResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// File extension used for archived entries
pub const ARCHIVE_EXTENSION: &str = "tar";

/// Resolves cache-relative paths under a single root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for the given cache root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the entry for `path` inside the cache root
    pub fn resolve(&self, path: &Path) -> CacheResult<PathBuf> {
        Ok(self.root.join(clean_relative(path)?))
    }

    /// Location of the archive file for `path` inside the cache root
    ///
    /// The archive extension is appended to the cleaned file name
    /// (`vendor/bundle` -> `vendor/bundle.tar`), so entries that differ only in
    /// their own extension never share an archive.
    pub fn archive_path(&self, path: &Path) -> CacheResult<PathBuf> {
        let cleaned = clean_relative(path)?;
        let mut file_name = cleaned
            .file_name()
            .ok_or_else(|| CacheError::PathInvalid {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?
            .to_os_string();
        file_name.push(".");
        file_name.push(ARCHIVE_EXTENSION);

        Ok(self.root.join(cleaned.with_file_name(file_name)))
    }
}

/// Lexically clean a cache-relative path
///
/// Drops `.` segments and folds `..` into its parent. Absolute paths and
/// paths that climb above their starting point are rejected.
pub fn clean_relative(path: &Path) -> CacheResult<PathBuf> {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => cleaned.push(part),
            Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(CacheError::PathEscapesRoot(path.to_path_buf()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(CacheError::PathEscapesRoot(path.to_path_buf()));
            }
        }
    }

    if cleaned.as_os_str().is_empty() {
        return Err(CacheError::PathInvalid {
            path: path.to_path_buf(),
            reason: "path does not name a cache entry".to_string(),
        });
    }

    Ok(cleaned)
}

/// Whether `path` exists, following symlinks
///
/// Absence, including a file where a parent directory should be, is
/// `Ok(false)`; only unexpected failures are errors.
pub fn path_exists(path: &Path) -> CacheResult<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if is_absent(&e) => Ok(false),
        Err(e) => Err(CacheError::io(format!("checking {}", path.display()), e)),
    }
}
