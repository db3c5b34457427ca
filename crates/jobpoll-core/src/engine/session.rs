//! Background poll session and its cancellation token.
//!
//! Supersession hazard: a background loop that finishes just as a newer poll
//! starts must never deliver a stale callback after (or racing with) the
//! newer one. The token therefore guards the cancelled flag with a mutex and
//! performs the cancellation check and the delivery under the same lock that
//! `cancel` takes, which makes check-then-deliver indivisible relative to a
//! superseding cancel. An `AtomicBool` alone would leave a window between
//! the load and the callback call.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Shared cancellation token. Set by the foreground when a session is
/// superseded; checked by the background at delivery time.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<Mutex<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the session as cancelled. Once this returns, no delivery
    /// through this token can run anymore.
    pub fn cancel(&self) {
        *self.cancelled.lock().unwrap() = true;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().unwrap()
    }

    /// Runs `deliver` unless the token was cancelled, holding the lock for
    /// the duration of the call. Returns `None` when the delivery was
    /// suppressed.
    pub fn deliver<T>(&self, deliver: impl FnOnce() -> T) -> Option<T> {
        let guard = self.cancelled.lock().unwrap();
        if *guard {
            return None;
        }
        Some(deliver())
    }
}

/// One background polling run: its cancellation token plus the handle of the
/// thread driving the loop. Dropped (thread detached) when superseded or
/// once its terminal result has been delivered.
#[derive(Debug)]
pub struct PollSession {
    pub cancel: CancelToken,
    pub handle: JoinHandle<()>,
}

impl PollSession {
    /// Cooperative cancellation: suppresses callback delivery but never
    /// interrupts an in-flight probe or sleep.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
