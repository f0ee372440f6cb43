use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Mints collection ids from a strictly monotonic millisecond clock.
///
/// An id is the current wall clock in milliseconds wherever possible, so ids
/// double as creation-time surrogates (see `models::created_instant`). When
/// two creations land in the same millisecond the later one takes
/// `last + 1`; distinct calls therefore never collide, even under a clock
/// that stalls or steps backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next unique id.
    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}
