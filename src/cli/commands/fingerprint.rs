//! Fingerprint command - print a directory's change-detection token

use crate::cache::{Cache, Fingerprint, Lookup};
use crate::cli::args::{FingerprintArgs, OutputFormat};
use crate::error::CacheResult;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the fingerprint command
pub fn execute(args: FingerprintArgs, cache: &Cache) -> CacheResult<()> {
    match cache.fingerprint(&args.path)? {
        Lookup::Found(fingerprint) => print_fingerprint(&args.path, &fingerprint, args.format)?,
        Lookup::NotFound => ui::step_info(
            &UiContext::detect(),
            &format!("No directory at {}", args.path.display()),
        ),
    }

    Ok(())
}

/// Print a fingerprint on stdout in the requested format
pub(crate) fn print_fingerprint(
    path: &Path,
    fingerprint: &Fingerprint,
    format: OutputFormat,
) -> CacheResult<()> {
    match format {
        OutputFormat::Plain => println!("{}", fingerprint),
        OutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct FingerprintJson<'a> {
                path: &'a Path,
                fingerprint: &'a Fingerprint,
            }

            let json = serde_json::to_string(&FingerprintJson { path, fingerprint })?;
            println!("{}", json);
        }
    }
    Ok(())
}
