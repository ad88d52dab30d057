//! The publish loop: discover, publish each profile in turn, package, clean up.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::{
    cli::RunContext,
    config::PublishSettings,
    lib::{dotnet, errors::PublishError, fs as staging_fs, output, telemetry::ProfileSpan},
};

use super::{
    archiver::{self, ArchiveOutcome, DebugSymbols},
    locator,
    runner::{self, ProfileInvocation, PublishOutcome},
    Profile,
};

pub const DOTNET_DOWNLOAD_URL: &str = "https://dotnet.microsoft.com/en-us/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Publish,
    Archive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSuccess {
    pub name: String,
    pub archive: Option<ArchiveOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFailure {
    pub name: String,
    pub stage: FailureStage,
    pub exit_code: Option<i32>,
    pub message: String,
}

/// What happened to every profile of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub profiles_found: usize,
    pub succeeded: Vec<ProfileSuccess>,
    pub failed: Vec<ProfileFailure>,
    pub cancelled: bool,
}

/// Publish every profile under `ctx.project_path`, strictly one at a time.
///
/// Per-profile failures (non-zero exit, spawn errors, packaging errors) are
/// reported and recorded in the summary; only setup errors abort the run.
pub async fn run_publish(
    ctx: &RunContext,
    settings: &PublishSettings,
    cancel: CancellationToken,
) -> Result<RunSummary, PublishError> {
    if !dotnet::dotnet_available(&settings.dotnet.path) {
        output::print_error(&format!(
            "The dotnet CLI must be installed, download it here: {DOTNET_DOWNLOAD_URL}"
        ));
        warn!(
            target: "batch_publish::run",
            dotnet = %settings.dotnet.path.display(),
            "dotnet executable not found"
        );
    }

    fs::create_dir_all(&ctx.output_path).map_err(|source| PublishError::CreateDir {
        path: ctx.output_path.clone(),
        source,
    })?;

    let profiles = if ctx.embedded {
        locator::materialize_embedded_profiles(&ctx.project_path)?
    } else {
        locator::find_profiles(&ctx.project_path)?
    };

    let mut summary = RunSummary {
        profiles_found: profiles.len(),
        ..RunSummary::default()
    };
    if profiles.is_empty() {
        output::print_no_profiles(&ctx.project_path.display().to_string());
        info!(
            target: "batch_publish::run",
            path = %ctx.project_path.display(),
            embedded = ctx.embedded,
            "No publish profiles found"
        );
        return Ok(summary);
    }

    output::print_info(&format!("Processing {} profiles.", profiles.len()));
    let build_root = match prepare_build_root(ctx) {
        Ok(dir) => dir,
        Err(err) => {
            locator::cleanup_generated(&profiles);
            return Err(err);
        }
    };

    for profile in &profiles {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        let done = publish_one(ctx, settings, profile, &build_root, &cancel, &mut summary).await;
        if !done {
            summary.cancelled = true;
            break;
        }
    }

    if ctx.package {
        if let Err(err) = staging_fs::remove_staging_dir(&build_root) {
            warn!(
                target: "batch_publish::run",
                path = %build_root.display(),
                error = %err,
                "Failed to remove staging directory"
            );
        }
    }
    if ctx.embedded {
        locator::cleanup_generated(&profiles);
    }

    info!(
        target: "batch_publish::run",
        found = summary.profiles_found,
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        cancelled = summary.cancelled,
        "Publish run finished"
    );
    if summary.cancelled {
        output::print_error("Canceled.");
    } else {
        output::print_success("Done!");
    }
    Ok(summary)
}

/// `<output>/tmp/<id>/` when packaging, else the output directory itself.
fn prepare_build_root(ctx: &RunContext) -> Result<PathBuf, PublishError> {
    if !ctx.package {
        return Ok(ctx.output_path.clone());
    }
    staging_fs::create_staging_dir(&ctx.output_path).map_err(|source| PublishError::CreateDir {
        path: ctx.output_path.join(staging_fs::STAGING_DIR_NAME),
        source,
    })
}

/// Publish (and optionally package) one profile. Returns false if the run was cancelled.
async fn publish_one(
    ctx: &RunContext,
    settings: &PublishSettings,
    profile: &Profile,
    build_root: &Path,
    cancel: &CancellationToken,
    summary: &mut RunSummary,
) -> bool {
    output::print_progress(&format!("Publishing {}", profile.name));
    let span = ProfileSpan::start(&profile.name);
    let profile_build_dir = build_root.join(&profile.name);
    let log_file = ctx
        .log
        .then(|| ctx.output_path.join(format!("{}.log", profile.name)));

    let invocation = ProfileInvocation {
        dotnet: &settings.dotnet,
        project_path: &ctx.project_path,
        profile_name: &profile.name,
        output_dir: &profile_build_dir,
        log_file: log_file.as_deref(),
    };
    let result = runner::run_profile(invocation, cancel)
        .instrument(span.span().clone())
        .await;

    match result {
        Ok(PublishOutcome::Succeeded) => {}
        Ok(PublishOutcome::Cancelled) => {
            span.finish("cancelled", None);
            return false;
        }
        Ok(PublishOutcome::Failed { exit_code }) => {
            span.finish("failed", exit_code);
            report_failure(
                summary,
                ProfileFailure {
                    name: profile.name.clone(),
                    stage: FailureStage::Publish,
                    exit_code,
                    message: match exit_code {
                        Some(code) => format!("dotnet publish exited with code {code}"),
                        None => "dotnet publish was terminated by a signal".to_string(),
                    },
                },
            );
            return true;
        }
        Err(err) => {
            span.finish("failed", None);
            report_failure(
                summary,
                ProfileFailure {
                    name: profile.name.clone(),
                    stage: FailureStage::Publish,
                    exit_code: None,
                    message: err.to_string(),
                },
            );
            return true;
        }
    }

    if !ctx.package {
        span.finish("succeeded", Some(0));
        summary.succeeded.push(ProfileSuccess {
            name: profile.name.clone(),
            archive: None,
        });
        return true;
    }

    let archive_path = ctx.output_path.join(format!("{}.zip", profile.name));
    let debug = if ctx.include_debug {
        DebugSymbols::Include
    } else {
        DebugSymbols::Exclude(&settings.package.debug_extensions)
    };
    match archiver::package_profile(&profile_build_dir, &archive_path, debug) {
        Ok(outcome) => {
            span.finish("packaged", Some(0));
            output::print_stat("archive", &outcome.archive_path.display().to_string());
            output::print_stat("sha256", &outcome.sha256);
            summary.succeeded.push(ProfileSuccess {
                name: profile.name.clone(),
                archive: Some(outcome),
            });
        }
        Err(err) => {
            span.finish("archive_failed", Some(0));
            report_failure(
                summary,
                ProfileFailure {
                    name: profile.name.clone(),
                    stage: FailureStage::Archive,
                    exit_code: Some(0),
                    message: err.to_string(),
                },
            );
        }
    }
    true
}

fn report_failure(summary: &mut RunSummary, failure: ProfileFailure) {
    let headline = match failure.stage {
        FailureStage::Publish => format!("Failed to publish {}", failure.name),
        FailureStage::Archive => format!("Failed to package {}", failure.name),
    };
    output::print_error(&headline);
    output::print_error(&format!("  {}", failure.message));
    warn!(
        target: "batch_publish::run",
        profile = %failure.name,
        stage = ?failure.stage,
        exit_code = failure.exit_code,
        reason = %failure.message,
        "Profile failed"
    );
    summary.failed.push(failure);
}
