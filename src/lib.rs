//! buildcache - build-time directory cache
//!
//! Persists computed artifacts (installed dependencies, compiled assets)
//! between successive builds of the same application, either as plain
//! directory copies or as tar archives that are only re-packed when their
//! fingerprint changes.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use cache::{ArchiveStatus, Cache, CopyMode, Fingerprint, Lookup};
pub use error::{CacheError, CacheResult};
