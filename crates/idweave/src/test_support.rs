//! Mock clocks shared by the unit tests.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    error::{Error, Result},
    time::Clock,
};

fn at(unix_ms: i64) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp_millis(unix_ms)
        .expect("mock reading in range")
        .fixed_offset()
}

/// Always reports the same instant.
pub(crate) struct FixedClock(pub(crate) i64);

impl Clock for FixedClock {
    fn now(&self, _: Option<DateTime<Utc>>, _: Option<bool>) -> Result<DateTime<FixedOffset>> {
        Ok(at(self.0))
    }
}

/// Reports `readings` in order, one per call, then keeps repeating the last.
pub(crate) struct ScriptedClock {
    readings: Vec<i64>,
    next: AtomicUsize,
}

impl ScriptedClock {
    pub(crate) fn new(readings: impl IntoIterator<Item = i64>) -> Self {
        let readings: Vec<_> = readings.into_iter().collect();
        assert!(!readings.is_empty());
        Self {
            readings,
            next: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl Clock for ScriptedClock {
    fn now(&self, _: Option<DateTime<Utc>>, _: Option<bool>) -> Result<DateTime<FixedOffset>> {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(at(self.readings[i.min(self.readings.len() - 1)]))
    }
}

/// Reports whatever was last [`set`](Self::set).
pub(crate) struct SettableClock(AtomicI64);

impl SettableClock {
    pub(crate) fn new(unix_ms: i64) -> Self {
        Self(AtomicI64::new(unix_ms))
    }

    pub(crate) fn set(&self, unix_ms: i64) {
        self.0.store(unix_ms, Ordering::SeqCst);
    }
}

impl Clock for SettableClock {
    fn now(&self, _: Option<DateTime<Utc>>, _: Option<bool>) -> Result<DateTime<FixedOffset>> {
        Ok(at(self.0.load(Ordering::SeqCst)))
    }
}

/// Never produces a reading.
pub(crate) struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self, _: Option<DateTime<Utc>>, _: Option<bool>) -> Result<DateTime<FixedOffset>> {
        Err(Error::ClockUnavailable {
            reason: "broken".into(),
        })
    }
}
