//! Load and validate publish settings.
use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod dotnet;
pub mod package;
pub mod telemetry;

pub use dotnet::{
    parse_dotnet_section, DotnetSection, RawDotnetSection, DEFAULT_CONFIGURATION,
    DEFAULT_DOTNET_PATH,
};
pub use package::{
    parse_package_section, PackageSection, RawPackageSection, DEFAULT_DEBUG_EXTENSIONS,
};

pub const CONFIG_ENV_KEY: &str = "BATCH_PUBLISH_CONFIG";
pub const PROJECT_CONFIG_FILE: &str = "batch-publish.toml";

/// Where the settings file path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    Project,
    Defaults,
}

/// Top-level settings container.
#[derive(Debug, Clone, Default)]
pub struct PublishSettings {
    pub dotnet: DotnetSection,
    pub package: PackageSection,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawPublishSettings {
    dotnet: Option<RawDotnetSection>,
    package: Option<RawPackageSection>,
}

impl PublishSettings {
    /// Resolve the settings file: CLI override, then `BATCH_PUBLISH_CONFIG`,
    /// then `<project>/batch-publish.toml` if present, else built-in defaults.
    pub fn resolve(
        cli_override: Option<PathBuf>,
        project_path: &Path,
    ) -> Result<Self, ConfigError> {
        let env_override = env::var_os(CONFIG_ENV_KEY)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let (path, source) = resolve_settings_path(cli_override, env_override, project_path);
        telemetry::log_source(path.as_deref(), source);

        match (path, source) {
            (None, _) => Ok(Self::default()),
            (Some(path), ConfigSource::Cli | ConfigSource::Env) if !path.is_file() => {
                Err(ConfigError::NotFound { path })
            }
            (Some(path), _) => Self::load_from_path(path),
        }
    }

    /// Load settings from a specific TOML file.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "batch_publish::config",
            path = %path.display(),
            "Starting settings load"
        );

        let builder = config::Config::builder().add_source(
            config::File::from(path.clone()).format(config::FileFormat::Toml),
        );
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "batch_publish::config",
                path = %path.display(),
                reason = %error,
                "Failed to read settings file"
            );
            error
        })?;

        let raw: RawPublishSettings = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "batch_publish::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse settings file"
            );
            error
        })?;

        let settings = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "batch_publish::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate settings file"
            );
            err
        })?;

        telemetry::log_loaded(&settings);
        Ok(settings)
    }

    fn from_raw(raw: RawPublishSettings, path: PathBuf) -> Result<Self, ConfigError> {
        let dotnet = parse_dotnet_section(raw.dotnet, &path)?;
        let package = parse_package_section(raw.package, &path)?;

        Ok(Self {
            dotnet,
            package,
            source_path: Some(path),
        })
    }
}

fn resolve_settings_path(
    cli_override: Option<PathBuf>,
    env_override: Option<PathBuf>,
    project_path: &Path,
) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_override {
        return (Some(path), ConfigSource::Cli);
    }
    if let Some(path) = env_override {
        return (Some(path), ConfigSource::Env);
    }
    let project_file = project_path.join(PROJECT_CONFIG_FILE);
    if project_file.is_file() {
        return (Some(project_file), ConfigSource::Project);
    }
    (None, ConfigSource::Defaults)
}
