use std::path::Path;

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_DEBUG_EXTENSIONS: &[&str] = &["pdb"];

/// Archive packaging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSection {
    /// Extensions (without the dot) left out of archives unless `--debug` is given.
    pub debug_extensions: Vec<String>,
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            debug_extensions: DEFAULT_DEBUG_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawPackageSection {
    pub debug_extensions: Option<Vec<String>>,
}

pub fn parse_package_section(
    raw: Option<RawPackageSection>,
    path: &Path,
) -> Result<PackageSection, ConfigError> {
    let Some(extensions) = raw.unwrap_or_default().debug_extensions else {
        return Ok(PackageSection::default());
    };

    let mut debug_extensions = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let normalized = ext.trim().trim_start_matches('.').to_string();
        if normalized.is_empty() || normalized.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "package.debug_extensions",
                message: format!("`{ext}` is not a file extension"),
            });
        }
        debug_extensions.push(normalized);
    }

    Ok(PackageSection { debug_extensions })
}
