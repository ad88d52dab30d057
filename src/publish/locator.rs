//! Discovery and generation of publish profile descriptors.

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::lib::errors::LocateError;

use super::{templates::EMBEDDED_PROFILES, Profile};

pub const PROFILE_EXTENSION: &str = "pubxml";
pub const PROJECT_EXTENSION: &str = "csproj";
/// Profiles live in `<project-dir>/Properties/PublishProfiles/`.
pub const PROFILE_DIR_COMPONENTS: [&str; 2] = ["Properties", "PublishProfiles"];

/// Recursively find every `*.pubxml` under `root`, sorted by path.
pub fn find_profiles(root: &Path) -> Result<Vec<Profile>, LocateError> {
    Ok(find_files(root, PROFILE_EXTENSION)?
        .into_iter()
        .filter_map(Profile::discovered)
        .collect())
}

/// Write the built-in profiles next to every `*.csproj` under `root`.
///
/// Descriptors that already exist are reused as-is and never marked generated.
/// On a write failure the files written so far are removed again.
pub fn materialize_embedded_profiles(root: &Path) -> Result<Vec<Profile>, LocateError> {
    let project_dirs: BTreeSet<PathBuf> = find_files(root, PROJECT_EXTENSION)?
        .into_iter()
        .filter_map(|project| project.parent().map(Path::to_path_buf))
        .collect();

    let mut profiles = Vec::new();
    for project_dir in project_dirs {
        if let Err(err) = write_embedded_set(&project_dir, &mut profiles) {
            cleanup_generated(&profiles);
            return Err(err);
        }
    }
    Ok(profiles)
}

fn write_embedded_set(project_dir: &Path, out: &mut Vec<Profile>) -> Result<(), LocateError> {
    let dir = PROFILE_DIR_COMPONENTS
        .iter()
        .fold(project_dir.to_path_buf(), |dir, part| dir.join(part));
    fs::create_dir_all(&dir).map_err(|source| LocateError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    for template in &EMBEDDED_PROFILES {
        let path = dir.join(template.file_name());
        if path.exists() {
            warn!(
                target: "batch_publish::run",
                path = %path.display(),
                "Publish profile already exists; using it instead of the built-in one"
            );
            out.push(Profile::new(path, template.name, false));
            continue;
        }
        fs::write(&path, template.render()).map_err(|source| LocateError::Write {
            path: path.clone(),
            source,
        })?;
        out.push(Profile::new(path, template.name, true));
    }
    Ok(())
}

/// Delete the descriptors that were generated for this run.
pub fn cleanup_generated(profiles: &[Profile]) {
    for profile in profiles.iter().filter(|profile| profile.generated) {
        match fs::remove_file(&profile.path) {
            Ok(()) => debug!(
                target: "batch_publish::run",
                path = %profile.path.display(),
                "Removed generated publish profile"
            ),
            Err(err) => warn!(
                target: "batch_publish::run",
                path = %profile.path.display(),
                error = %err,
                "Failed to remove generated publish profile"
            ),
        }
    }
}

/// Walk `root` for files with `extension` (case-insensitive), sorted by path.
///
/// Unreadable subdirectories are skipped with a warning; an unreadable root is an error.
fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LocateError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                warn!(
                    target: "batch_publish::run",
                    path = %err.path().unwrap_or(root).display(),
                    error = %err,
                    "Skipping unreadable path"
                );
                continue;
            }
            Err(source) => {
                return Err(LocateError::Walk {
                    path: root.to_path_buf(),
                    source,
                })
            }
        };
        let matches = entry
            .path()
            .extension()
            .and_then(OsStr::to_str)
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if entry.file_type().is_file() && matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
