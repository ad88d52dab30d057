//! Batch publishing: profile discovery, build tool invocation, and packaging.
pub mod archiver;
pub mod interrupt;
pub mod locator;
pub mod orchestrator;
pub mod runner;
pub mod templates;

use std::path::PathBuf;

pub use archiver::{package_profile, ArchiveOutcome, DebugSymbols};
pub use interrupt::watch_for_interrupt;
pub use locator::{
    cleanup_generated, find_profiles, materialize_embedded_profiles, PROFILE_EXTENSION,
    PROJECT_EXTENSION,
};
pub use orchestrator::{run_publish, FailureStage, ProfileFailure, ProfileSuccess, RunSummary};
pub use runner::{run_profile, ProfileInvocation, PublishOutcome};
pub use templates::{EmbeddedProfile, EMBEDDED_PROFILES};

/// A publish profile descriptor, identified by its file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub path: PathBuf,
    pub name: String,
    /// Written by this run from a built-in template; deleted when the run ends.
    pub generated: bool,
}

impl Profile {
    pub fn new(path: PathBuf, name: &str, generated: bool) -> Self {
        Self {
            path,
            name: name.to_string(),
            generated,
        }
    }

    /// Profile for a descriptor found on disk; `None` if the path has no file stem.
    pub fn discovered(path: PathBuf) -> Option<Self> {
        let name = path.file_stem()?.to_string_lossy().to_string();
        Some(Self {
            path,
            name,
            generated: false,
        })
    }
}
