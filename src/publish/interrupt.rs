//! Ctrl+C handling for a publish run.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::lib::output;

/// Exit status used when a second Ctrl+C forces termination.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Cancel `token` on the first Ctrl+C.
///
/// The running profile's child process is killed by the runner; a second
/// Ctrl+C terminates immediately. The task ends on its own once the token is
/// cancelled elsewhere and no interrupt arrived.
pub fn watch_for_interrupt(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            received = tokio::signal::ctrl_c() => {
                if let Err(err) = received {
                    warn!(
                        target: "batch_publish::run",
                        error = %err,
                        "Failed to listen for Ctrl+C"
                    );
                    return;
                }
            }
            _ = token.cancelled() => return,
        }

        output::print_warning("Canceling....");
        warn!(target: "batch_publish::run", "Interrupt received, cancelling run");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(target: "batch_publish::run", "Second interrupt received, exiting");
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}
