//! Error types for buildcache
//!
//! All modules use `CacheResult<T>` as their return type. Expected absence
//! (missing source, missing entry, missing archive) is not an error; see
//! [`crate::cache::Lookup`].

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildcache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in buildcache
#[derive(Error, Debug)]
pub enum CacheError {
    // Path errors
    #[error("Path escapes the cache root: {0}")]
    PathEscapesRoot(PathBuf),

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    // Filesystem errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("Archive error for {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache root could not be determined")]
    CacheRootUnknown,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an archive error for the given archive file
    pub fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }

    /// Create a traversal error for a walk rooted at `path`
    pub fn walk(path: impl Into<PathBuf>, err: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Whether the error came from the filesystem rather than from bad input
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Walk { .. } | Self::Archive { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PathEscapesRoot(_) => {
                Some("Cache paths must be relative and stay inside the cache root")
            }
            Self::CacheRootUnknown => Some("Pass --root or set cache.root in the config file"),
            Self::Archive { .. } => Some("Run: buildcache clear <path> to drop the archive"),
            _ => None,
        }
    }
}

/// Whether an IO error only means the path is not there
///
/// A file standing where a parent directory is expected (`Gemfile.lock/x`)
/// counts as absent too.
pub fn is_absent(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}
