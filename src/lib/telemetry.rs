//! Telemetry initialization and per-profile span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset; status lines cover the normal case.
const DEFAULT_FILTER: &str = "warn";

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of one profile's publish.
pub struct ProfileSpan {
    span: Span,
    started_at: Instant,
    profile: String,
}

impl ProfileSpan {
    /// Start a span for `profile`.
    pub fn start(profile: &str) -> Self {
        let span = info_span!(target: "batch_publish::run", "publish_profile", profile);
        Self {
            span,
            started_at: Instant::now(),
            profile: profile.to_string(),
        }
    }

    /// Span covering this profile's publish, for instrumenting futures.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "batch_publish::run",
            profile = %self.profile,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Finished publish profile"
        );
    }
}
