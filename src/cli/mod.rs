//! CLI entrypoint module structure.
pub mod args;
pub mod context;
pub mod exit;

pub use args::{ParsedCommand, PublishArgs};
pub use context::{resolve_dir, RunContext};
pub use exit::RuntimeExit;

/// Product name shown by `--version`.
pub const APP_NAME: &str = "Batch Publish and Package .Net Projects";
