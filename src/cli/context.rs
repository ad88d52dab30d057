//! `RunContext` and path resolution.
use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Immutable inputs of one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub project_path: PathBuf,
    pub output_path: PathBuf,
    /// Zip each profile's output into `<output>/<profile>.zip`.
    pub package: bool,
    /// Keep debug-symbol files in archives.
    pub include_debug: bool,
    /// Write `<output>/<profile>.log`.
    pub log: bool,
    /// Generate the built-in profiles instead of scanning for existing ones.
    pub embedded: bool,
}

/// Resolve a directory flag: strip stray quotes, default to the current
/// directory, and make relative paths absolute against it.
pub fn resolve_dir(raw: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    let Some(raw) = raw else {
        return Ok(cwd);
    };

    let path = match raw.to_str() {
        Some(text) => PathBuf::from(text.trim_matches('"')),
        None => raw,
    };
    if path.as_os_str().is_empty() {
        return Ok(cwd);
    }
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(cwd.join(path))
}
