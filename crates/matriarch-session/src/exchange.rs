use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use tracing::trace;

/// Hands one decoded response value from the delivery thread to the caller.
///
/// `deliver` runs on the transport's delivery thread; `await_value` runs on
/// the thread that issued the request. The slot is the only source of
/// truth: the condition variable is used for wake-ups only and every wait
/// re-checks the slot.
#[derive(Debug, Default)]
pub struct ExchangeState {
    slot: Mutex<Option<u16>>,
    ready: Condvar,
}

impl ExchangeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and wake the waiter.
    ///
    /// An undelivered previous value is overwritten.
    pub fn deliver(&self, value: u16) {
        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = slot.replace(value) {
                trace!(previous, value, "overwrote undelivered response");
            }
        }
        self.ready.notify_one();
    }

    /// Block until a value is delivered or `timeout` elapses.
    ///
    /// A returned value is consumed: the next call will not see it again.
    pub fn await_value(&self, timeout: Duration) -> Option<u16> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut slot, _timed_out) = self
            .ready
            .wait_timeout_while(slot, timeout, |pending| pending.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }

    /// Discard any value nobody waited for, returning it.
    ///
    /// Called before each new request so a reply that arrived after an
    /// earlier timeout is never mistaken for the next answer.
    pub fn reset(&self) -> Option<u16> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Whether a delivered value is waiting to be consumed.
    pub fn has_result(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
