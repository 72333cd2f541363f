//! Entry commands - store, add, load, copy, clear and exists

use crate::cache::{Cache, Lookup};
use crate::cli::args::{CopyArgs, LoadArgs, PathArgs, StoreArgs};
use crate::error::CacheResult;
use crate::ui::{self, UiContext};

/// Execute the store command
pub fn store(args: StoreArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let path = args.path.as_deref().unwrap_or(&args.from);

    match cache.store(&args.from, Some(path))? {
        Lookup::Found(()) => ui::step_ok_detail(
            &ctx,
            &format!("Stored {}", args.from.display()),
            &path.display().to_string(),
        ),
        Lookup::NotFound => ui::step_warn_hint(
            &ctx,
            &format!("Nothing to store at {}", args.from.display()),
            "cache entry cleared",
        ),
    }

    Ok(())
}

/// Execute the add command
pub fn add(args: StoreArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let path = args.path.as_deref().unwrap_or(&args.from);

    match cache.add(&args.from, Some(path))? {
        Lookup::Found(()) => ui::step_ok_detail(
            &ctx,
            &format!("Added {}", args.from.display()),
            &path.display().to_string(),
        ),
        Lookup::NotFound => {
            ui::step_warn(&ctx, &format!("Nothing to add at {}", args.from.display()))
        }
    }

    Ok(())
}

/// Execute the load command
pub fn load(args: LoadArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();

    let result = if args.no_overwrite {
        cache.load_without_overwrite(&args.path, args.to.as_deref())?
    } else {
        cache.load(&args.path, args.to.as_deref())?
    };

    match result {
        Lookup::Found(()) => {
            let dest = args.to.as_deref().unwrap_or(&args.path);
            ui::step_ok_detail(
                &ctx,
                &format!("Loaded {}", args.path.display()),
                &dest.display().to_string(),
            );
        }
        Lookup::NotFound => ui::step_info(
            &ctx,
            &format!("No cache entry for {}", args.path.display()),
        ),
    }

    Ok(())
}

/// Execute the copy command
pub fn copy(args: CopyArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();

    match cache.cache_copy(&args.from, &args.to)? {
        Lookup::Found(()) => ui::step_ok(
            &ctx,
            &format!("Copied {} to {}", args.from.display(), args.to.display()),
        ),
        Lookup::NotFound => ui::step_info(
            &ctx,
            &format!("No cache entry for {}", args.from.display()),
        ),
    }

    Ok(())
}

/// Execute the clear command
pub fn clear(args: PathArgs, cache: &Cache) -> CacheResult<()> {
    let ctx = UiContext::detect();

    if cache.clear(&args.path)? {
        ui::step_ok(&ctx, &format!("Cleared {}", args.path.display()));
    } else {
        ui::step_info(
            &ctx,
            &format!("No cache entry for {}", args.path.display()),
        );
    }

    Ok(())
}

/// Execute the exists command, returning whether the entry is present
pub fn exists(args: PathArgs, cache: &Cache) -> CacheResult<bool> {
    cache.exists(&args.path)
}
