//! Ctrl-C handling for long-running commands.

use apx_core::control::AbortToken;
use std::future::Future;
use std::io;

/// Exit status after a forced second interrupt (128 + SIGINT).
pub const FORCED_EXIT_CODE: i32 = 130;

/// Waits on `next_signal`: the first interrupt flips `abort` so the work
/// stops at the next chunk boundary, the second returns `true` so the caller
/// can exit without waiting for the in-flight request. Returns `false` when
/// the signal source fails.
pub async fn watch_interrupts<F, Fut>(abort: AbortToken, mut next_signal: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        return false;
    }
    tracing::info!("interrupt received, cancelling upload");
    eprintln!("\nCancelling after the current chunk; press Ctrl-C again to exit now");
    abort.abort();

    if next_signal().await.is_err() {
        return false;
    }
    tracing::warn!("second interrupt, exiting");
    true
}
