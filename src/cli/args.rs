//! CLI argument definitions using clap derive

use crate::cache::Fingerprint;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// buildcache - build-time directory cache
///
/// Persists dependency and asset directories between builds of the same
/// application, as plain directory copies or as tar archives.
#[derive(Parser, Debug)]
#[command(name = "buildcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BUILDCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides cache.root)
    #[arg(long, global = true, env = "BUILDCACHE_ROOT")]
    pub root: Option<PathBuf>,

    /// Directory that source and destination paths are relative to
    #[arg(short = 'C', long, global = true)]
    pub work_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace a cache entry with a copy of a local path
    Store(StoreArgs),

    /// Copy a local path into a cache entry without clearing it
    Add(StoreArgs),

    /// Copy a cache entry out to a local path
    Load(LoadArgs),

    /// Merge one cache entry into another
    Copy(CopyArgs),

    /// Remove a cache entry
    Clear(PathArgs),

    /// Exit 0 if a cache entry exists, 1 otherwise
    Exists(PathArgs),

    /// Print the change-detection fingerprint of a local directory
    Fingerprint(FingerprintArgs),

    /// Store or restore a directory as a single archive
    Archive(ArchiveArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for store and add
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Local path to cache
    pub from: PathBuf,

    /// Cache entry to write (defaults to the local path)
    #[arg(long = "as", value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Cache entry to read
    pub path: PathBuf,

    /// Local destination (defaults to the entry path)
    #[arg(long, value_name = "DEST")]
    pub to: Option<PathBuf>,

    /// Keep files that already exist at the destination
    #[arg(long)]
    pub no_overwrite: bool,
}

/// Arguments for the copy command
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source cache entry
    pub from: PathBuf,

    /// Destination cache entry
    pub to: PathBuf,
}

/// A single cache entry path
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Cache entry path
    pub path: PathBuf,
}

/// Arguments for the fingerprint command
#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Local directory to fingerprint
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the archive command
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Archive action
    #[command(subcommand)]
    pub action: ArchiveAction,
}

/// Archive actions
#[derive(Subcommand, Debug)]
pub enum ArchiveAction {
    /// Pack a local directory into its cache archive
    Store {
        /// Local directory (also names the archive)
        path: PathBuf,

        /// Skip packing when the directory still has this fingerprint
        #[arg(long, value_name = "FINGERPRINT")]
        if_changed: Option<Fingerprint>,
    },

    /// Unpack an archive into the working directory and print its fingerprint
    Load {
        /// Directory the archive was stored for
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config action
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for machine-readable results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bare value
    #[default]
    Plain,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_store() {
        let cli = Cli::parse_from(["buildcache", "store", "vendor/bundle"]);
        match cli.command {
            Commands::Store(args) => {
                assert_eq!(args.from, PathBuf::from("vendor/bundle"));
                assert!(args.path.is_none());
            }
            _ => panic!("expected Store command"),
        }
    }

    #[test]
    fn cli_parses_add_as() {
        let cli = Cli::parse_from(["buildcache", "add", "node_modules", "--as", "node/modules"]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.path, Some(PathBuf::from("node/modules")));
            }
            _ => panic!("expected Add command"),
        }
    }

    #[test]
    fn cli_parses_load_no_overwrite() {
        let cli = Cli::parse_from([
            "buildcache",
            "load",
            "bin",
            "--to",
            "local/bin",
            "--no-overwrite",
        ]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.path, PathBuf::from("bin"));
                assert_eq!(args.to, Some(PathBuf::from("local/bin")));
                assert!(args.no_overwrite);
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn cli_parses_archive_store_if_changed() {
        let cli = Cli::parse_from([
            "buildcache",
            "archive",
            "store",
            "public/assets",
            "--if-changed",
            "0123456789abcdef0123456789abcdef01234567",
        ]);
        match cli.command {
            Commands::Archive(ArchiveArgs {
                action: ArchiveAction::Store { path, if_changed },
            }) => {
                assert_eq!(path, PathBuf::from("public/assets"));
                assert_eq!(
                    if_changed.unwrap().as_str(),
                    "0123456789abcdef0123456789abcdef01234567"
                );
            }
            _ => panic!("expected Archive Store command"),
        }
    }

    #[test]
    fn cli_rejects_bad_fingerprint() {
        let result = Cli::try_parse_from([
            "buildcache",
            "archive",
            "store",
            "public/assets",
            "--if-changed",
            "not-a-fingerprint",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_global_flags() {
        let cli = Cli::parse_from([
            "buildcache",
            "-C",
            "/app",
            "--root",
            "/cache",
            "exists",
            "vendor",
        ]);
        assert_eq!(cli.work_dir, Some(PathBuf::from("/app")));
        assert_eq!(cli.root, Some(PathBuf::from("/cache")));
        assert!(matches!(cli.command, Commands::Exists(_)));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["buildcache", "config"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["buildcache", "-v", "config"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["buildcache", "-vv", "config"]);
        assert_eq!(cli.verbose, 2);
    }
}
