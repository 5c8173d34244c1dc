use chrono::{DateTime, FixedOffset, Utc};

use crate::{error::Result, time::Clock};

/// A [`Clock`] reading the operating system's wall clock on every call.
///
/// This clock performs no reflux compensation: if the system clock is stepped
/// backwards, so are its readings. Prefer [`MonotonicClock`] for generators
/// that must never observe a regression.
///
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    prefer_utc: bool,
}

impl SystemClock {
    /// A system clock whose default zone is UTC.
    pub const fn utc() -> Self {
        Self { prefer_utc: true }
    }

    /// A system clock whose default zone is the local zone.
    pub const fn local() -> Self {
        Self { prefer_utc: false }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> Result<DateTime<FixedOffset>> {
        let instant = reference.unwrap_or_else(Utc::now);
        Ok(super::in_zone(instant, use_utc.unwrap_or(self.prefer_utc)))
    }
}
