use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::lib::{errors::ArchiveError, fs as archive_fs};

/// Whether debug-symbol files go into the archive.
#[derive(Debug, Clone, Copy)]
pub enum DebugSymbols<'a> {
    Include,
    /// Leave out files with these extensions (no leading dot).
    Exclude(&'a [String]),
}

/// Result of packaging one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub archive_path: PathBuf,
    pub entries: usize,
    pub sha256: String,
}

/// Zip the files directly inside `build_dir` into `archive_path`, then delete `build_dir`.
///
/// Any existing file at `archive_path` is removed first so the archive is never merged.
pub fn package_profile(
    build_dir: &Path,
    archive_path: &Path,
    debug: DebugSymbols<'_>,
) -> Result<ArchiveOutcome, ArchiveError> {
    match fs::remove_file(archive_path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ArchiveError::Cleanup {
                path: archive_path.to_path_buf(),
                source,
            })
        }
    }

    let entries = archive_fs::zip_flat_directory(build_dir, archive_path, |path| match debug {
        DebugSymbols::Include => true,
        DebugSymbols::Exclude(extensions) => !archive_fs::has_extension(path, extensions),
    })
    .map_err(|err| {
        discard_partial_archive(archive_path);
        err
    })?;
    let sha256 = archive_fs::compute_sha256(archive_path)?;

    fs::remove_dir_all(build_dir).map_err(|source| ArchiveError::Cleanup {
        path: build_dir.to_path_buf(),
        source,
    })?;

    info!(
        target: "batch_publish::run",
        archive = %archive_path.display(),
        entries,
        sha256 = %sha256,
        "Packaged build output"
    );
    Ok(ArchiveOutcome {
        archive_path: archive_path.to_path_buf(),
        entries,
        sha256,
    })
}

fn discard_partial_archive(archive_path: &Path) {
    if !archive_path.exists() {
        return;
    }
    if let Err(err) = fs::remove_file(archive_path) {
        warn!(
            target: "batch_publish::run",
            archive = %archive_path.display(),
            error = %err,
            "Failed to remove incomplete archive"
        );
    }
}
