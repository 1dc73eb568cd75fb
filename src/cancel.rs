use std::time::Duration;

use tokio::sync::watch;

use crate::{Result, error::NmfError};

/// Cooperative cancellation for the two places this client suspends: the
/// rate-limit back-off sleep and the wait for the human authorization step.
///
/// Intentionally simple: `cancel()` flips a boolean and wakes sleepers;
/// waiters select on either their own completion or the flag.
#[derive(Clone, Debug)]
pub struct CancellationState {
    tx: watch::Sender<bool>,
}

impl Default for CancellationState {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Resolves once the flag is set. Never resolves if the sender is gone.
pub async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if *rx.borrow() {
        return;
    }
    loop {
        if rx.changed().await.is_err() {
            // Sender dropped; treat as non-cancellable.
            std::future::pending::<()>().await;
        }
        if *rx.borrow() {
            return;
        }
    }
}

/// Sleeps for `duration` unless cancellation arrives first.
pub async fn sleep_with_cancel(mut rx: watch::Receiver<bool>, duration: Duration) -> Result<()> {
    if *rx.borrow() {
        return Err(NmfError::Cancelled);
    }

    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = cancelled(&mut rx) => Err(NmfError::Cancelled),
    }
}
