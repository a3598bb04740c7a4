//! Courtesy rate limiting between successive requests to the same provider.
//!
//! Not a correctness mechanism: it only spaces out bursts of quote requests.

use std::cell::Cell;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Throttle {
    spacing: Duration,
    last: Cell<Option<Instant>>,
}

impl Throttle {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: Cell::new(None),
        }
    }

    /// A throttle that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Sleep until at least `spacing` has passed since the previous call.
    pub fn wait(&self) {
        if let Some(last) = self.last.get() {
            let remaining = self.spacing.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
        self.last.set(Some(Instant::now()));
    }
}
