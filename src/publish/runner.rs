use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::ChildStdout,
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::DotnetSection,
    lib::{dotnet, errors::RunnerError, output},
};

/// Lines buffered between the stdout reader and the log writer.
const LINE_BUFFER: usize = 256;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Everything needed to publish one profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileInvocation<'a> {
    pub dotnet: &'a DotnetSection,
    pub project_path: &'a Path,
    pub profile_name: &'a str,
    pub output_dir: &'a Path,
    /// Append every stdout line here when set.
    pub log_file: Option<&'a Path>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Succeeded,
    /// Non-zero exit; `None` when the process was ended by a signal.
    Failed { exit_code: Option<i32> },
    Cancelled,
}

/// Run `dotnet publish` for one profile and wait for it to exit.
///
/// Stdout is forwarded line by line through a channel to a writer task that
/// appends to the log file, so the log grows while the build runs. Both tasks
/// are joined before returning. Cancelling `cancel` kills the child.
/// Log write failures are printed as warnings; the outcome depends on the
/// exit status alone.
pub async fn run_profile(
    invocation: ProfileInvocation<'_>,
    cancel: &CancellationToken,
) -> Result<PublishOutcome, RunnerError> {
    let mut command = dotnet::build_publish_command(
        dotnet::DotnetCommandConfig {
            dotnet_path: &invocation.dotnet.path,
            configuration: &invocation.dotnet.configuration,
            extra_args: &invocation.dotnet.extra_args,
        },
        dotnet::DotnetPublishRequest {
            project_path: invocation.project_path,
            profile_name: invocation.profile_name,
            output_dir: invocation.output_dir,
        },
    );

    info!(
        target: "batch_publish::process",
        profile = %invocation.profile_name,
        output_dir = %invocation.output_dir.display(),
        log = invocation.log_file.is_some(),
        "Starting dotnet publish"
    );

    let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
        program: invocation.dotnet.path.clone(),
        source,
    })?;

    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    let reader = match child.stdout.take() {
        Some(stdout) => Some(tokio::spawn(forward_lines(stdout, tx))),
        None => {
            drop(tx);
            None
        }
    };
    let writer = tokio::spawn(write_lines(
        rx,
        invocation.log_file.map(Path::to_path_buf),
        invocation.profile_name.to_string(),
    ));

    let status = tokio::select! {
        status = child.wait() => status.map_err(|source| RunnerError::Wait {
            program: invocation.dotnet.path.clone(),
            source,
        })?,
        _ = cancel.cancelled() => {
            if let Err(err) = child.kill().await {
                warn!(
                    target: "batch_publish::process",
                    profile = %invocation.profile_name,
                    error = %err,
                    "Failed to kill dotnet process"
                );
            }
            abort_output_tasks(reader, writer);
            return Ok(PublishOutcome::Cancelled);
        }
    };

    if let Some(reader) = reader {
        if let Err(err) = reader.await {
            warn!(
                target: "batch_publish::process",
                error = %err,
                "stdout reader task failed"
            );
        }
    }
    match writer.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            output::print_warning(&format!("  {err}"));
            warn!(
                target: "batch_publish::process",
                profile = %invocation.profile_name,
                error = %err,
                "Failed to write log file"
            );
        }
        Err(err) => warn!(
            target: "batch_publish::process",
            error = %err,
            "log writer task failed"
        ),
    }

    if status.success() {
        Ok(PublishOutcome::Succeeded)
    } else {
        Ok(PublishOutcome::Failed {
            exit_code: status.code(),
        })
    }
}

fn abort_output_tasks(
    reader: Option<JoinHandle<()>>,
    writer: JoinHandle<Result<(), RunnerError>>,
) {
    if let Some(reader) = reader {
        reader.abort();
    }
    writer.abort();
}

/// Read stdout until EOF and send each line, without its terminator, to `tx`.
async fn forward_lines(stdout: ChildStdout, tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(stdout);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer)
                    .trim_end_matches(|c: char| c == '\n' || c == '\r')
                    .to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(
                    target: "batch_publish::process",
                    error = %err,
                    "Failed to read dotnet output"
                );
                break;
            }
        }
    }
}

/// Drain `rx`, appending each line to `log_path` when set.
///
/// Keeps draining after a write error so the child never blocks on a full pipe;
/// the first error is returned once the stream ends.
async fn write_lines(
    mut rx: mpsc::Receiver<String>,
    log_path: Option<PathBuf>,
    profile: String,
) -> Result<(), RunnerError> {
    let mut first_error = None;
    let mut log_file = match &log_path {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path).await {
            Ok(file) => Some(file),
            Err(source) => {
                first_error = Some(source);
                None
            }
        },
        None => None,
    };

    while let Some(line) = rx.recv().await {
        debug!(target: "batch_publish::process", profile = %profile, "{line}");
        let failed = match log_file.as_mut() {
            Some(file) => append_line(file, &line).await.err(),
            None => None,
        };
        if let Some(source) = failed {
            first_error.get_or_insert(source);
            log_file = None;
        }
    }

    match (first_error, log_path) {
        (Some(source), Some(path)) => Err(RunnerError::Log { path, source }),
        _ => Ok(()),
    }
}

async fn append_line(file: &mut File, line: &str) -> io::Result<()> {
    file.write_all(line.as_bytes()).await?;
    file.write_all(LINE_ENDING.as_bytes()).await?;
    file.flush().await
}
