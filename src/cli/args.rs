//! CLI argument definitions and `RunContext` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::{resolve_dir, RunContext};

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    ShowVersion,
    Run {
        context: RunContext,
        config_override: Option<PathBuf>,
    },
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batch-publish",
    about = "Batch Publish and Package .Net Projects",
    long_about = "Runs `dotnet publish` once for every publish profile (*.pubxml) found under the project folder, optionally packaging each result into <output>/<profile>.zip.",
    disable_version_flag = true
)]
pub struct PublishArgs {
    /// Displays the version of the application.
    #[arg(short = 'v', long = "version")]
    pub version: bool,
    /// Path to the project folder (defaults to the current directory).
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path: Option<PathBuf>,
    /// Automatically packages the binaries into archive files.
    #[arg(short = 'c', long = "package")]
    pub package: bool,
    /// The output directory (defaults to the current directory).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// Packages the pdb debug files.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
    /// Creates a log file for each profile.
    #[arg(short = 'l', long = "log")]
    pub log: bool,
    /// Uses the built-in profiles for Windows, macOS and Linux on x64 and ARM64,
    /// self-contained and framework-dependent.
    #[arg(short = 'e', long = "embedded")]
    pub embedded: bool,
    /// Path to a settings file (overrides BATCH_PUBLISH_CONFIG).
    #[arg(long = "config", value_name = "FILE")]
    pub config_override: Option<PathBuf>,
}

impl PublishArgs {
    /// Build the immutable run context from the flags.
    pub fn build(self) -> Result<RunContext> {
        Ok(RunContext {
            project_path: resolve_dir(self.path)?,
            output_path: resolve_dir(self.output)?,
            package: self.package,
            include_debug: self.debug,
            log: self.log,
            embedded: self.embedded,
        })
    }

    /// Parse CLI args into either version display or a publish run.
    pub fn into_command(self) -> Result<ParsedCommand> {
        if self.version {
            return Ok(ParsedCommand::ShowVersion);
        }
        let config_override = self.config_override.clone();
        Ok(ParsedCommand::Run {
            context: self.build()?,
            config_override,
        })
    }
}
