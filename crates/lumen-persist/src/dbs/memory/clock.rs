use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Wall clock that never repeats or goes backwards
///
/// Every reading is at least one microsecond after the previous one, so
/// records created back to back sort in creation order.
#[derive(Debug, Default)]
pub(super) struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    pub(super) fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let previous = match self.last_micros.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wall.max(last + 1))
        }) {
            Ok(prev) | Err(prev) => prev,
        };
        DateTime::from_timestamp_micros(wall.max(previous + 1)).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_strictly_increase() {
        let clock = MonotonicClock::default();
        let mut last = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > last);
            last = next;
        }
    }
}
