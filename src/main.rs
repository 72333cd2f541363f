//! buildcache - build-time directory cache
//!
//! CLI entry point that dispatches to subcommands.

use buildcache::cache::Cache;
use buildcache::cli::{commands, Cli, Commands};
use buildcache::config::ConfigManager;
use buildcache::error::{CacheError, CacheResult};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CacheResult<ExitCode> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using config {}", config_manager.path().display());

    // Config command doesn't need a cache root
    if let Commands::Config(args) = cli.command {
        commands::config(args, &config, &config_manager)?;
        return Ok(ExitCode::SUCCESS);
    }

    let root = cli
        .root
        .clone()
        .or_else(|| config.cache.root_dir())
        .ok_or(CacheError::CacheRootUnknown)?;
    let mut cache = Cache::new(root);
    if let Some(dir) = cli.work_dir {
        cache = cache.with_work_dir(dir);
    }
    debug!("Cache root {}", cache.root().display());

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Store(args) => commands::store(args, &cache)?,
        Commands::Add(args) => commands::add(args, &cache)?,
        Commands::Load(args) => commands::load(args, &cache)?,
        Commands::Copy(args) => commands::copy(args, &cache)?,
        Commands::Clear(args) => commands::clear(args, &cache)?,
        Commands::Fingerprint(args) => commands::fingerprint(args, &cache)?,
        Commands::Archive(args) => commands::archive(args, &cache)?,
        Commands::Exists(args) => {
            return Ok(if commands::exists(args, &cache)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("buildcache=warn"),
        1 => EnvFilter::new("buildcache=info"),
        _ => EnvFilter::new("buildcache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
