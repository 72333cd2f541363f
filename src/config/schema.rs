//! Configuration schema for buildcache
//!
//! Configuration is stored at `~/.config/buildcache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory (default: platform cache dir + `buildcache`)
    pub root: Option<PathBuf>,
}

impl CacheConfig {
    /// The configured root, falling back to the platform cache directory
    pub fn root_dir(&self) -> Option<PathBuf> {
        self.root
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("buildcache")))
    }
}
