use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use portable_atomic::{AtomicU64, Ordering};

use crate::{error::Result, time::Clock};

/// Shared ticker thread that updates every millisecond.
struct SharedTickerInner {
    current: AtomicU64,
    _handle: std::sync::OnceLock<JoinHandle<()>>,
}

/// A reflux-compensating [`Clock`].
///
/// The wall clock is read exactly once, at construction, to anchor the clock
/// to real time. From then on readings advance with a monotonic timer
/// (`Instant`), so they never go backwards even if the system clock is stepped
/// by NTP or by hand.
///
/// Internally, a background thread updates a shared atomic counter once per
/// millisecond with the elapsed time since the anchor. The thread exits once
/// the last clone of the clock is dropped.
///
/// Readings drift from the wall clock by however much the wall clock is
/// adjusted after construction; this is the price of never regressing.
#[derive(Clone)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    anchor: DateTime<Utc>,
    prefer_utc: bool,
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock anchored at the current wall-clock time,
    /// reporting UTC by default.
    fn default() -> Self {
        Self::with_anchor(Utc::now())
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock whose zero tick corresponds to `anchor`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use idweave::{MonotonicClock, unix_millis};
    ///
    /// let anchor = Utc::now();
    /// let clock = MonotonicClock::with_anchor(anchor);
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    ///
    /// assert!(unix_millis(&clock).unwrap() >= anchor.timestamp_millis());
    /// ```
    pub fn with_anchor(anchor: DateTime<Utc>) -> Self {
        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: std::sync::OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                inner_ref.current.store(now_ms, Ordering::Release);

                tick = now_ms + 1;
            }
        });
        let _ = inner._handle.set(handle);

        Self {
            inner,
            anchor,
            prefer_utc: true,
        }
    }

    /// Makes the local zone the default for calls passing `use_utc = None`.
    #[must_use]
    pub const fn prefer_local(mut self) -> Self {
        self.prefer_utc = false;
        self
    }

    fn current(&self) -> DateTime<Utc> {
        let elapsed = self.inner.current.load(Ordering::Acquire);
        let elapsed = i64::try_from(elapsed).unwrap_or(i64::MAX);
        self.anchor + TimeDelta::milliseconds(elapsed)
    }
}

impl Clock for MonotonicClock {
    fn now(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> Result<DateTime<FixedOffset>> {
        let instant = reference.unwrap_or_else(|| self.current());
        Ok(super::in_zone(instant, use_utc.unwrap_or(self.prefer_utc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::unix_millis;

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::default();
        let mut last = unix_millis(&clock).unwrap();
        for _ in 0..10_000 {
            let now = unix_millis(&clock).unwrap();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_real_time() {
        let anchor = Utc::now();
        let clock = MonotonicClock::with_anchor(anchor);
        thread::sleep(Duration::from_millis(20));
        let elapsed = unix_millis(&clock).unwrap() - anchor.timestamp_millis();
        assert!(elapsed >= 10, "elapsed only {elapsed}ms");
    }

    #[test]
    fn reference_is_normalized_not_replaced() {
        let clock = MonotonicClock::default();
        let reference = DateTime::<Utc>::from_timestamp_millis(1_000).unwrap();
        let now = clock.now(Some(reference), Some(true)).unwrap();
        assert_eq!(now.timestamp_millis(), 1_000);
        assert_eq!(now.offset().local_minus_utc(), 0);
    }
}
