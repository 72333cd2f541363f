//! Archive command - pack and unpack directories as single tar files

use crate::cache::{ArchiveStatus, Cache, Lookup};
use crate::cli::args::{ArchiveAction, ArchiveArgs};
use crate::cli::commands::fingerprint::print_fingerprint;
use crate::error::CacheResult;
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the archive command
pub fn execute(args: ArchiveArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();

    match args.action {
        ArchiveAction::Store { path, if_changed } => {
            let result = match if_changed {
                Some(previous) => cache.store_archive_if_changed(&path, Some(&previous))?,
                None => cache
                    .store_archive(&path)?
                    .map(|_| ArchiveStatus::Written),
            };

            match result {
                Lookup::Found(ArchiveStatus::Written) => {
                    let archive = cache.archive_path(&path)?;
                    ui::step_ok_detail(
                        &ctx,
                        &format!("Archived {}", path.display()),
                        &archive.display().to_string(),
                    );
                }
                Lookup::Found(ArchiveStatus::Unchanged) => {
                    ui::step_info(&ctx, &format!("{} unchanged", path.display()))
                }
                Lookup::NotFound => {
                    ui::step_info(&ctx, &format!("Nothing to archive at {}", path.display()))
                }
            }
        }
        ArchiveAction::Load { path, format } => match cache.load_archive(&path)? {
            Lookup::Found(fingerprint) => {
                debug!("Restored {} with fingerprint {}", path.display(), fingerprint);
                print_fingerprint(&path, &fingerprint, format)?;
            }
            Lookup::NotFound => ui::step_info(
                &ctx,
                &format!("No archive for {}", path.display()),
            ),
        },
    }

    Ok(())
}
