//! Millisecond nonces.
//!
//! Nonces are the current time in milliseconds, bumped past the previous
//! nonce when the clock has not advanced, so one manager never hands out
//! the same value twice.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Time source for nonces.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Hands out strictly increasing nonces.
pub struct NonceManager {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl NonceManager {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    /// `max(now, last + 1)`.
    pub fn next(&self) -> u64 {
        let now = self.clock.now_ms();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// The most recently issued nonce, 0 before the first.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl Default for NonceManager {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for NonceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceManager")
            .field("last", &self.last())
            .finish()
    }
}
