use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_DOTNET_PATH: &str = "dotnet";
pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Build tool invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotnetSection {
    pub path: PathBuf,
    pub configuration: String,
    pub extra_args: Vec<String>,
}

impl Default for DotnetSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DOTNET_PATH),
            configuration: DEFAULT_CONFIGURATION.to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawDotnetSection {
    pub path: Option<PathBuf>,
    pub configuration: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

pub fn parse_dotnet_section(
    raw: Option<RawDotnetSection>,
    path: &Path,
) -> Result<DotnetSection, ConfigError> {
    let dotnet_raw = raw.unwrap_or_default();

    let tool_path = dotnet_raw
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOTNET_PATH));
    if tool_path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "dotnet.path",
            message: "Specify the dotnet executable name or an absolute path".into(),
        });
    }

    let configuration = dotnet_raw
        .configuration
        .unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string());
    validate_configuration(&configuration, path)?;

    Ok(DotnetSection {
        path: tool_path,
        configuration,
        extra_args: dotnet_raw.extra_args.unwrap_or_default(),
    })
}

fn validate_configuration(configuration: &str, path: &Path) -> Result<(), ConfigError> {
    if !configuration.trim().is_empty() && !configuration.contains(char::is_whitespace) {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "dotnet.configuration",
        message: "Use a single build configuration name such as `Release`".into(),
    })
}
