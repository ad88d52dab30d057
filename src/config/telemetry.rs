use std::path::Path;

use tracing::{debug, info};

use super::{ConfigSource, PublishSettings, CONFIG_ENV_KEY, PROJECT_CONFIG_FILE};

pub fn log_source(path: Option<&Path>, source: ConfigSource) {
    match (path, source) {
        (Some(path), ConfigSource::Cli) => info!(
            target: "batch_publish::config",
            path = %path.display(),
            "Loading settings from --config"
        ),
        (Some(path), ConfigSource::Env) => info!(
            target: "batch_publish::config",
            path = %path.display(),
            "Loading settings using BATCH_PUBLISH_CONFIG environment variable"
        ),
        (Some(path), _) => info!(
            target: "batch_publish::config",
            path = %path.display(),
            "Loading settings from project directory"
        ),
        (None, _) => debug!(
            target: "batch_publish::config",
            env = CONFIG_ENV_KEY,
            project_file = PROJECT_CONFIG_FILE,
            "No settings file found; using built-in defaults"
        ),
    }
}

pub fn log_loaded(settings: &PublishSettings) {
    info!(
        target: "batch_publish::config",
        path = %settings
            .source_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        dotnet = %settings.dotnet.path.display(),
        configuration = %settings.dotnet.configuration,
        extra_args = settings.dotnet.extra_args.len(),
        debug_extensions = ?settings.package.debug_extensions,
        "Settings file loaded successfully"
    );
}
