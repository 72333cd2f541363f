//! Directory fingerprints for change detection
//!
//! A fingerprint covers the relative name and modification time (whole
//! seconds) of every entry, the root directory itself included as `.`. Names
//! are hashed as raw bytes. File contents and permission bits are not part of it, so
//! an edit that keeps the same mtime goes unnoticed.

use crate::cache::Lookup;
use crate::error::{is_absent, CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, Metadata};
use std::path::Path;
use std::str::FromStr;
use std::time::UNIX_EPOCH;
use tracing::debug;
use walkdir::WalkDir;

/// Number of hex characters in a fingerprint (160 bits)
pub const FINGERPRINT_LEN: usize = 40;

/// Opaque change-detection token for a directory tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The fingerprint as a lowercase hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != FINGERPRINT_LEN || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CacheError::User(format!(
                "Invalid fingerprint: {} (expected {} hex characters)",
                s, FINGERPRINT_LEN
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

/// Fingerprint the tree rooted at `path`
///
/// Returns `Lookup::NotFound` when `path` does not exist.
pub fn fingerprint(path: &Path) -> CacheResult<Lookup<Fingerprint>> {
    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if is_absent(&e) => return Ok(Lookup::NotFound),
        Err(e) => return Err(CacheError::io(format!("reading {}", path.display()), e)),
    }

    let mut hasher = Sha256::new();
    let mut entries = 0usize;

    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| CacheError::walk(path, e))?;
        let metadata = entry.metadata().map_err(|e| CacheError::walk(path, e))?;
        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());

        hasher.update(entry_name(relative));
        hasher.update(b"\0");
        hasher.update(mtime_secs(&metadata).to_string().as_bytes());
        hasher.update(b"\n");
        entries += 1;
    }

    let digest = hasher.finalize();
    let fingerprint = Fingerprint(hex::encode(&digest[..FINGERPRINT_LEN / 2]));
    debug!(
        "Fingerprinted {} ({} entries): {}",
        path.display(),
        entries,
        fingerprint
    );
    Ok(Lookup::Found(fingerprint))
}

/// Slash-joined relative name as raw bytes, `.` for the root itself
fn entry_name(relative: &Path) -> Vec<u8> {
    if relative.as_os_str().is_empty() {
        return b".".to_vec();
    }
    let mut name = Vec::new();
    for (i, component) in relative.components().enumerate() {
        if i > 0 {
            name.push(b'/');
        }
        name.extend_from_slice(component.as_os_str().as_encoded_bytes());
    }
    name
}

fn mtime_secs(metadata: &Metadata) -> i64 {
    match metadata.modified() {
        Ok(time) => match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        },
        Err(_) => 0,
    }
}
