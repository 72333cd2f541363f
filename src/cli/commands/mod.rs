//! CLI command implementations

pub mod archive;
pub mod config;
pub mod entry;
pub mod fingerprint;

pub use archive::execute as archive;
pub use config::execute as config;
pub use entry::{add, clear, copy, exists, load, store};
pub use fingerprint::execute as fingerprint;
