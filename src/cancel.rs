//! Cancellation - cooperative cancellation signal threaded through every operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::AccessError;

#[derive(Debug, Default)]
struct Signal {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A cloneable cancellation signal.
///
/// All clones observe the same state. Operations check it at each suspension point
/// and stop producing results once it fires.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    signal: Arc<Signal>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        if !self.signal.cancelled.swap(true, Ordering::SeqCst) {
            self.signal.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(AccessError::Cancelled)` once the signal has fired.
    pub fn check(&self) -> Result<(), AccessError> {
        if self.is_cancelled() {
            Err(AccessError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait until the signal fires.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.signal.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
