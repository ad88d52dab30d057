//! Shared helpers for building `dotnet publish` commands.

use std::{path::Path, process::Stdio};

use tokio::process::Command;

pub struct DotnetCommandConfig<'a> {
    pub dotnet_path: &'a Path,
    pub configuration: &'a str,
    pub extra_args: &'a [String],
}

pub struct DotnetPublishRequest<'a> {
    pub project_path: &'a Path,
    pub profile_name: &'a str,
    pub output_dir: &'a Path,
}

/// Build a `dotnet publish` command for a single publish profile.
///
/// Stdout is piped so the caller can stream it; stderr goes to the terminal.
pub fn build_publish_command(
    config: DotnetCommandConfig<'_>,
    request: DotnetPublishRequest<'_>,
) -> Command {
    let mut command = Command::new(config.dotnet_path);
    command.kill_on_drop(true);
    command.current_dir(request.project_path);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::inherit());

    command.arg("publish");
    command.arg("-c").arg(config.configuration);
    command.arg(format!("/p:PublishProfile={}", request.profile_name));
    command.arg("-o").arg(request.output_dir);

    for arg in config.extra_args {
        command.arg(arg);
    }

    command
}

/// Return true if the build tool can be found, either at an explicit path or on `PATH`.
pub fn dotnet_available(dotnet_path: &Path) -> bool {
    if dotnet_path.components().count() > 1 {
        return dotnet_path.is_file();
    }
    which::which(dotnet_path).is_ok()
}
