//! Build-time directory cache
//!
//! Persists computed artifacts (installed dependencies, compiled assets)
//! between builds of the same application. Entries are addressed by a path
//! relative to the cache root and stored either as plain directory trees or
//! as single tar archives.
//!
//! # Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `store` | Clear the entry, then copy the source in (exact mirror) |
//! | `add` | Copy the source in without clearing (may accumulate stale files) |
//! | `load` | Copy the entry out, optionally without overwriting |
//! | `store_archive` | Pack a directory into `<entry>.tar` |
//! | `store_archive_if_changed` | Re-pack only when the fingerprint moved |
//! | `load_archive` | Unpack into the working directory, return the fingerprint |
//!
//! Expected absence is reported as [`Lookup::NotFound`]; only real I/O
//! failures surface as errors.

pub mod archive;
pub mod copy;
pub mod fingerprint;
pub mod paths;
pub mod store;

pub use copy::CopyMode;
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
pub use paths::{PathResolver, ARCHIVE_EXTENSION};
pub use store::Cache;

/// Outcome of an operation whose subject may legitimately be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Lookup<T = ()> {
    /// The subject existed and the operation completed
    Found(T),
    /// Nothing existed at the requested location
    NotFound,
}

impl<T> Lookup<T> {
    /// Whether the subject was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into an `Option`, discarding the absence marker
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Map the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// What `store_archive_if_changed` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// A new archive was written
    Written,
    /// The fingerprint matched, the archive was left alone
    Unchanged,
}
