//! Per-request cancellation.
//!
//! Every request-issuing operation takes a [`CancelToken`]. Firing the paired
//! [`CancelHandle`] completes the request as [`ClientError::Cancelled`] at its next
//! suspension point, so a view that is being torn down (or that starts a newer request)
//! can abandon a stale one without leaving an orphaned completion behind.

use crate::{ClientError, ClientResult};
use std::future::Future;
use tokio::sync::watch;

/// Fires the paired token(s).
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// A new token observing this handle.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observes a [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Creates a connected handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelToken {
    /// A token that never fires.
    pub fn never() -> Self {
        let (_, token) = cancel_pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the handle fires. Pends forever if the handle was dropped unfired.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Runs `request` unless the token fires first.
    pub async fn run<T, F>(&self, request: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let mut token = self.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = request => result,
        }
    }
}
