//! Filesystem helpers for build output directories and archives.

use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use uuid::Uuid;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::lib::errors::ArchiveError;

/// Unix permission bits applied to generated ZIP entries.
const ZIP_FILE_PERMISSIONS: u32 = 0o755;
/// Name of the staging directory created under the output root.
pub const STAGING_DIR_NAME: &str = "tmp";

/// Create `<output>/tmp/<random-id>/` and return it.
pub fn create_staging_dir(output: &Path) -> io::Result<PathBuf> {
    let dir = output
        .join(STAGING_DIR_NAME)
        .join(Uuid::new_v4().simple().to_string());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Remove a unique staging directory, then its parent if nothing else is left in it.
pub fn remove_staging_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    if let Some(parent) = dir.parent() {
        let empty = match fs::read_dir(parent) {
            Ok(mut entries) => entries.next().is_none(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => return Err(err),
        };
        if empty {
            fs::remove_dir(parent)?;
        }
    }
    Ok(())
}

/// Return true if `path` has one of `extensions` (case-insensitive, no leading dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Return the SHA256 of any file as a hex string.
pub fn compute_sha256(path: &Path) -> Result<String, ArchiveError> {
    let mut file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Zip the regular files directly inside `source` for which `include` returns true.
///
/// Subdirectories are not descended into. Entries are named after the file and
/// written in name order. Returns the number of entries written.
pub fn zip_flat_directory(
    source: &Path,
    destination: &Path,
    include: impl Fn(&Path) -> bool,
) -> Result<usize, ArchiveError> {
    if !source.is_dir() {
        return Err(ArchiveError::InvalidSource {
            path: source.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(source).map_err(|source_err| ArchiveError::ReadDir {
        path: source.to_path_buf(),
        source: source_err,
    })? {
        let entry = entry.map_err(|source_err| ArchiveError::ReadDir {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let path = entry.path();
        if path.is_file() && include(&path) {
            files.push(path);
        }
    }
    files.sort();

    let file = File::create(destination).map_err(|source_err| ArchiveError::Io {
        path: destination.to_path_buf(),
        source: source_err,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(ZIP_FILE_PERMISSIONS);

    for path in &files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        zip.start_file(name, options)
            .map_err(|source| ArchiveError::Zip {
                path: path.clone(),
                source,
            })?;
        let buffer = fs::read(path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        zip.write_all(&buffer).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
    }

    zip.finish().map_err(|source| ArchiveError::Zip {
        path: destination.to_path_buf(),
        source,
    })?;
    Ok(files.len())
}
