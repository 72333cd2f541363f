//! Recursive tree copy
//!
//! Copies a file or directory tree like `cp -a from/. to`: contents are merged
//! into the destination, permission bits and timestamps are kept, and
//! symlinks inside the tree are recreated rather than followed. A destination
//! that is itself a symlink to a directory is followed and merged into.

use crate::error::{is_absent, CacheError, CacheResult};
use std::fs::{self, File, FileTimes, Metadata};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// How to treat files that already exist at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Replace existing destination files
    #[default]
    Overwrite,
    /// Leave existing destination files untouched
    NoClobber,
}

/// Copy `from` onto `to`, creating parent directories as needed
///
/// Returns `Ok(false)` when `from` does not exist.
pub fn copy_tree(from: &Path, to: &Path, mode: CopyMode) -> CacheResult<bool> {
    let source_meta = match fs::metadata(from) {
        Ok(meta) => meta,
        Err(e) if is_absent(&e) => {
            debug!("Copy source {} does not exist", from.display());
            return Ok(false);
        }
        Err(e) => return Err(CacheError::io(format!("reading {}", from.display()), e)),
    };

    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CacheError::io(format!("creating directory {}", parent.display()), e))?;
    }

    if !source_meta.is_dir() {
        copy_file(from, to, &source_meta, mode)?;
        return Ok(true);
    }

    let created = match fs::metadata(to) {
        Ok(meta) if meta.is_dir() => false,
        _ => ensure_dir(to, mode)?,
    };
    let mut dirs = Vec::new();
    if created || mode == CopyMode::Overwrite {
        dirs.push((to.to_path_buf(), source_meta));
    }

    for entry in WalkDir::new(from)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CacheError::walk(from, e))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| CacheError::PathInvalid {
                path: entry.path().to_path_buf(),
                reason: format!("not inside {}", from.display()),
            })?;
        let dest = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest, mode)?;
            continue;
        }

        let metadata = entry.metadata().map_err(|e| CacheError::walk(from, e))?;
        if file_type.is_dir() {
            // No-clobber leaves the attributes of existing directories alone
            if ensure_dir(&dest, mode)? || mode == CopyMode::Overwrite {
                dirs.push((dest, metadata));
            }
        } else {
            copy_file(entry.path(), &dest, &metadata, mode)?;
        }
    }

    // Deepest first, so read-only directories are sealed after their contents
    for (dir, metadata) in dirs.iter().rev() {
        apply_dir_attributes(dir, metadata)?;
    }

    debug!("Copied {} to {}", from.display(), to.display());
    Ok(true)
}

/// Returns `true` when the directory had to be created
fn ensure_dir(path: &Path, mode: CopyMode) -> CacheResult<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(false),
        Ok(_) if mode == CopyMode::Overwrite => remove_existing(path)?,
        Ok(_) => {
            return Err(CacheError::PathInvalid {
                path: path.to_path_buf(),
                reason: "destination exists and is not a directory".to_string(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(CacheError::io(format!("reading {}", path.display()), e)),
    }

    fs::create_dir(path)
        .map_err(|e| CacheError::io(format!("creating directory {}", path.display()), e))?;
    Ok(true)
}

/// Returns `false` when the destination is kept because of no-clobber mode
fn prepare_destination(dest: &Path, mode: CopyMode) -> CacheResult<bool> {
    match fs::symlink_metadata(dest) {
        Ok(_) if mode == CopyMode::NoClobber => {
            trace!("Keeping existing {}", dest.display());
            Ok(false)
        }
        Ok(_) => {
            remove_existing(dest)?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(CacheError::io(format!("reading {}", dest.display()), e)),
    }
}

fn remove_existing(path: &Path) -> CacheResult<()> {
    let meta = fs::symlink_metadata(path)
        .map_err(|e| CacheError::io(format!("reading {}", path.display()), e))?;
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| CacheError::io(format!("removing {}", path.display()), e))
}

fn copy_file(src: &Path, dest: &Path, metadata: &Metadata, mode: CopyMode) -> CacheResult<()> {
    if !prepare_destination(dest, mode)? {
        return Ok(());
    }

    // fs::copy carries the permission bits over
    fs::copy(src, dest).map_err(|e| {
        CacheError::io(format!("copying {} to {}", src.display(), dest.display()), e)
    })?;

    set_times(dest, metadata)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path, mode: CopyMode) -> CacheResult<()> {
    let target = fs::read_link(src)
        .map_err(|e| CacheError::io(format!("reading link {}", src.display()), e))?;

    if !prepare_destination(dest, mode)? {
        return Ok(());
    }

    std::os::unix::fs::symlink(&target, dest)
        .map_err(|e| CacheError::io(format!("creating link {}", dest.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path, mode: CopyMode) -> CacheResult<()> {
    let metadata = fs::metadata(src)
        .map_err(|e| CacheError::io(format!("reading {}", src.display()), e))?;
    if metadata.is_dir() {
        return copy_tree(src, dest, mode).map(|_| ());
    }
    copy_file(src, dest, &metadata, mode)
}

fn set_times(path: &Path, metadata: &Metadata) -> CacheResult<()> {
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // Explicit timestamps only need ownership, so a read-only handle works
    File::open(path)
        .and_then(|file| file.set_times(times))
        .map_err(|e| CacheError::io(format!("setting times on {}", path.display()), e))
}

#[cfg(unix)]
fn apply_dir_attributes(dir: &Path, metadata: &Metadata) -> CacheResult<()> {
    set_times(dir, metadata)?;
    fs::set_permissions(dir, metadata.permissions())
        .map_err(|e| CacheError::io(format!("setting permissions on {}", dir.display()), e))
}

#[cfg(not(unix))]
fn apply_dir_attributes(_dir: &Path, _metadata: &Metadata) -> CacheResult<()> {
    Ok(())
}
