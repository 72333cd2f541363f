//! The cache facade
//!
//! Every call is a self-contained filesystem transaction; `Cache` itself holds
//! only the root and the working directory context.

use crate::cache::archive;
use crate::cache::copy::{copy_tree, CopyMode};
use crate::cache::fingerprint::{self, Fingerprint};
use crate::cache::paths::{clean_relative, path_exists, PathResolver};
use crate::cache::{ArchiveStatus, Lookup};
use crate::config::schema::CacheConfig;
use crate::error::{is_absent, CacheError, CacheResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory cache rooted at a single directory
#[derive(Debug, Clone)]
pub struct Cache {
    paths: PathResolver,
    work_dir: Option<PathBuf>,
}

impl Cache {
    /// Create a cache rooted at `root`
    ///
    /// The root is created lazily by the first write. Source and destination
    /// paths are resolved against the process working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathResolver::new(root),
            work_dir: None,
        }
    }

    /// Create a cache from the `[cache]` config section
    pub fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        let root = config.root_dir().ok_or(CacheError::CacheRootUnknown)?;
        Ok(Self::new(root))
    }

    /// Resolve source and destination paths (and unpack archives) against `dir`
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// The explicit working directory, if one was set
    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    /// Absolute location of the entry for `path`
    pub fn resolve(&self, path: &Path) -> CacheResult<PathBuf> {
        self.paths.resolve(path)
    }

    /// Absolute location of the archive for `path`
    pub fn archive_path(&self, path: &Path) -> CacheResult<PathBuf> {
        self.paths.archive_path(path)
    }

    /// Whether an entry currently exists for `path`
    pub fn exists(&self, path: &Path) -> CacheResult<bool> {
        path_exists(&self.resolve(path)?)
    }

    /// Remove the entry for `path`
    ///
    /// Returns `true` when something was removed and `false` when the entry
    /// was already absent.
    pub fn clear(&self, path: &Path) -> CacheResult<bool> {
        let target = self.resolve(path)?;

        let metadata = match fs::symlink_metadata(&target) {
            Ok(metadata) => metadata,
            Err(e) if is_absent(&e) => return Ok(false),
            Err(e) => return Err(CacheError::io(format!("reading {}", target.display()), e)),
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };

        match removed {
            Ok(()) => {
                info!("Cleared cache entry {}", path.display());
                Ok(true)
            }
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(CacheError::io(format!("removing {}", target.display()), e)),
        }
    }

    /// Replace the entry with a copy of `from`
    ///
    /// `path` defaults to `from`. The entry is cleared first, so files
    /// deleted from the source do not linger in the cache. Prefer this over
    /// [`Cache::add`].
    pub fn store(&self, from: &Path, path: Option<&Path>) -> CacheResult<Lookup> {
        let path = path.unwrap_or(from);
        let dest = self.resolve(path)?;

        self.clear(path)?;
        let result = self.copy(&self.local(from), &dest, CopyMode::Overwrite)?;
        if result.is_found() {
            info!("Stored {} as {}", from.display(), path.display());
        }
        Ok(result)
    }

    /// Copy `from` into the entry without clearing it first
    ///
    /// `path` defaults to `from`. Files removed from the source since an
    /// earlier call stay in the cache.
    pub fn add(&self, from: &Path, path: Option<&Path>) -> CacheResult<Lookup> {
        let path = path.unwrap_or(from);
        let dest = self.resolve(path)?;

        let result = self.copy(&self.local(from), &dest, CopyMode::Overwrite)?;
        if result.is_found() {
            info!("Added {} to {}", from.display(), path.display());
        }
        Ok(result)
    }

    /// Copy the entry for `path` out to `dest` (defaults to `path`)
    pub fn load(&self, path: &Path, dest: Option<&Path>) -> CacheResult<Lookup> {
        self.load_with(path, dest, CopyMode::Overwrite)
    }

    /// Like [`Cache::load`], leaving files that already exist at `dest` alone
    pub fn load_without_overwrite(&self, path: &Path, dest: Option<&Path>) -> CacheResult<Lookup> {
        self.load_with(path, dest, CopyMode::NoClobber)
    }

    fn load_with(&self, path: &Path, dest: Option<&Path>, mode: CopyMode) -> CacheResult<Lookup> {
        let source = self.resolve(path)?;
        let dest = self.local(dest.unwrap_or(path));

        let result = self.copy(&source, &dest, mode)?;
        if result.is_found() {
            info!("Loaded {} to {}", path.display(), dest.display());
        }
        Ok(result)
    }

    /// Merge one cache entry into another
    pub fn cache_copy(&self, from: &Path, to: &Path) -> CacheResult<Lookup> {
        let source = self.resolve(from)?;
        let dest = self.resolve(to)?;
        self.copy(&source, &dest, CopyMode::Overwrite)
    }

    /// Copy between two resolved locations
    pub fn copy(&self, from: &Path, to: &Path, mode: CopyMode) -> CacheResult<Lookup> {
        let copied = copy_tree(from, to, mode)?;
        Ok(if copied { Lookup::Found(()) } else { Lookup::NotFound })
    }

    /// Pack the directory at `path` into its archive, replacing any old one
    ///
    /// Returns the archive location, or `NotFound` when `path` does not exist.
    pub fn store_archive(&self, path: &Path) -> CacheResult<Lookup<PathBuf>> {
        let archive_path = self.archive_path(path)?;
        let source = self.local(path);

        if !path_exists(&source)? {
            debug!("Nothing to archive at {}", source.display());
            return Ok(Lookup::NotFound);
        }

        match fs::remove_file(&archive_path) {
            Ok(()) => debug!("Removed previous archive {}", archive_path.display()),
            Err(e) if is_absent(&e) => {}
            Err(e) => {
                return Err(CacheError::io(
                    format!("removing {}", archive_path.display()),
                    e,
                ))
            }
        }

        if let Some(parent) = archive_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CacheError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        archive::pack(&source, &clean_relative(path)?, &archive_path)?;
        info!(
            "Archived {} to {}",
            path.display(),
            archive_path.display()
        );
        Ok(Lookup::Found(archive_path))
    }

    /// Re-archive `path` only when its fingerprint differs from `previous`
    ///
    /// `previous` is normally the value returned by [`Cache::load_archive`];
    /// `None` (nothing was restored) always archives.
    pub fn store_archive_if_changed(
        &self,
        path: &Path,
        previous: Option<&Fingerprint>,
    ) -> CacheResult<Lookup<ArchiveStatus>> {
        let current = match self.fingerprint(path)? {
            Lookup::Found(current) => current,
            Lookup::NotFound => return Ok(Lookup::NotFound),
        };

        if previous == Some(&current) {
            debug!("{} unchanged ({}), skipping archive", path.display(), current);
            return Ok(Lookup::Found(ArchiveStatus::Unchanged));
        }

        Ok(self
            .store_archive(path)?
            .map(|_| ArchiveStatus::Written))
    }

    /// Unpack the archive for `path` into the working directory
    ///
    /// Returns the fingerprint of the restored directory, to be handed back to
    /// [`Cache::store_archive_if_changed`] after the build.
    pub fn load_archive(&self, path: &Path) -> CacheResult<Lookup<Fingerprint>> {
        let archive_path = self.archive_path(path)?;

        if !path_exists(&archive_path)? {
            debug!("No archive for {}", path.display());
            return Ok(Lookup::NotFound);
        }

        let dest = self
            .work_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        archive::unpack(&archive_path, &dest)?;
        info!("Restored {} from {}", path.display(), archive_path.display());

        self.fingerprint(path)
    }

    /// Fingerprint `path` relative to the working directory
    pub fn fingerprint(&self, path: &Path) -> CacheResult<Lookup<Fingerprint>> {
        fingerprint::fingerprint(&self.local(path))
    }

    /// Resolve a caller path against the working directory
    fn local(&self, path: &Path) -> PathBuf {
        match &self.work_dir {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}
