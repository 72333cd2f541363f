//! Status output for the CLI
//!
//! Status lines go to stderr so stdout stays machine-readable for build
//! scripts that capture fingerprints.
//!
//! # Example
//!
//! ```rust,ignore
//! use buildcache::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::step_ok(&ctx, "Stored vendor/bundle");
//! ui::step_warn_hint(&ctx, "Nothing cached for node_modules", "Run a full install");
//! ```

mod context;
mod output;

pub use context::UiContext;
pub use output::{key_value, remark, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint};
