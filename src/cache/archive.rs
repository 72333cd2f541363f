//! Tar packing and unpacking
//!
//! Entries are stored under the caller's relative path, the same layout
//! `tar -cf archive.tar path` produces, so unpacking into a working directory
//! recreates `path` beneath it.

use crate::error::{CacheError, CacheResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Pack `source` into a new archive at `archive`, naming entries under `entry_name`
pub fn pack(source: &Path, entry_name: &Path, archive: &Path) -> CacheResult<()> {
    let result = write_archive(source, entry_name, archive);

    if result.is_err() {
        // Never leave a truncated archive behind for the next load
        if let Err(e) = std::fs::remove_file(archive) {
            warn!("Failed to remove partial archive {}: {}", archive.display(), e);
        }
    }

    result.map_err(|e| CacheError::archive(archive, e))?;
    debug!("Packed {} into {}", source.display(), archive.display());
    Ok(())
}

fn write_archive(source: &Path, entry_name: &Path, archive: &Path) -> std::io::Result<()> {
    let file = File::create(archive)?;
    let mut builder = tar::Builder::new(BufWriter::new(file));
    builder.follow_symlinks(false);

    if source.is_dir() {
        builder.append_dir_all(entry_name, source)?;
    } else {
        builder.append_path_with_name(source, entry_name)?;
    }

    let mut writer = builder.into_inner()?;
    writer.flush()
}

/// Unpack `archive` into `dest`, restoring permissions and modification times
pub fn unpack(archive: &Path, dest: &Path) -> CacheResult<()> {
    let file = File::open(archive).map_err(|e| CacheError::archive(archive, e))?;

    let mut reader = tar::Archive::new(BufReader::new(file));
    reader.set_preserve_permissions(true);
    reader.set_preserve_mtime(true);
    reader.set_overwrite(true);
    reader
        .unpack(dest)
        .map_err(|e| CacheError::archive(archive, e))?;

    debug!("Unpacked {} into {}", archive.display(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn pack_and_unpack_under_entry_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app/public/assets");
        fs::create_dir_all(source.join("js")).unwrap();
        fs::write(source.join("js/app.js"), "console.log(1)").unwrap();
        fs::write(source.join("app.css"), "body{}").unwrap();

        let archive = dir.path().join("assets.tar");
        pack(&source, Path::new("public/assets"), &archive).unwrap();
        assert!(archive.is_file());

        let target = dir.path().join("restored");
        unpack(&archive, &target).unwrap();

        assert_eq!(
            fs::read_to_string(target.join("public/assets/js/app.js")).unwrap(),
            "console.log(1)"
        );
        assert_eq!(
            fs::read_to_string(target.join("public/assets/app.css")).unwrap(),
            "body{}"
        );
    }

    #[test]
    fn failed_pack_leaves_no_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("missing.tar");

        let err = pack(&dir.path().join("nope"), Path::new("nope"), &archive).unwrap_err();

        assert!(err.is_io_failure());
        assert!(!archive.exists());
    }

    #[test]
    fn unpack_corrupt_archive_fails() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("corrupt.tar");
        fs::write(&archive, vec![0xffu8; 1024]).unwrap();

        let err = unpack(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, CacheError::Archive { .. }));
    }
}
