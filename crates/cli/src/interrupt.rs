//! Ctrl-C cancellation for outstanding requests.

use ng12_core::CancelHandle;
use std::future::Future;
use tokio::io::{AsyncBufRead, Lines};

/// Drives `work` to completion, firing `handle` if Ctrl-C arrives first.
///
/// `work` is expected to observe the token paired with `handle`, so after a Ctrl-C it
/// resolves promptly with a cancelled outcome.
pub async fn cancel_on_interrupt<F: Future>(work: F, handle: &CancelHandle) -> F::Output {
    tokio::pin!(work);

    tokio::select! {
        out = &mut work => out,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    tracing::info!("interrupt received, cancelling request");
                    handle.cancel();
                }
                Err(e) => tracing::warn!("failed to listen for Ctrl-C: {}", e),
            }
            work.await
        }
    }
}

/// Reads the next input line, or `None` at end of input or once `interrupt` resolves.
///
/// An interrupt takes priority over buffered input. Reading is cancel-safe, so an interrupted
/// call loses no data.
pub async fn next_line_or_interrupt<R, F>(
    lines: &mut Lines<R>,
    interrupt: F,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    tokio::select! {
        biased;
        _ = interrupt => Ok(None),
        line = lines.next_line() => line,
    }
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
