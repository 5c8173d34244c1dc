use chrono::{DateTime, FixedOffset, Utc};
use futures::future::BoxFuture;

use crate::error::Result;

/// The clock service consumed by every generator.
///
/// Generators never read system time directly: they ask a `Clock` for "now"
/// and only react to what it returns. Compensating for clock reflux (the wall
/// clock stepping backwards after an NTP adjustment, for example) is the
/// clock's job; a Snowflake generator treats any decrease it still observes as
/// fatal.
///
/// # Parameters
/// - `reference`: when `Some`, the clock normalizes that instant instead of
///   reading the current time.
/// - `use_utc`: `Some(true)` for UTC, `Some(false)` for the local zone, `None`
///   for the clock's default zone.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, FixedOffset, TimeZone, Utc};
/// use idweave::{Clock, Result};
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(
///         &self,
///         _reference: Option<DateTime<Utc>>,
///         _use_utc: Option<bool>,
///     ) -> Result<DateTime<FixedOffset>> {
///         Ok(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap().fixed_offset())
///     }
/// }
///
/// assert_eq!(idweave::unix_millis(&FixedClock).unwrap(), 1_700_000_000_000);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    ///
    /// # Errors
    ///
    /// Implementations may fail with [`Error::ClockUnavailable`].
    ///
    /// [`Error::ClockUnavailable`]: crate::Error::ClockUnavailable
    fn now(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> Result<DateTime<FixedOffset>>;

    /// Asynchronous counterpart of [`Clock::now`].
    ///
    /// The default resolves immediately with [`Clock::now`]. Clocks backed by
    /// I/O (a time service, for instance) override this.
    fn now_async(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> BoxFuture<'_, Result<DateTime<FixedOffset>>> {
        Box::pin(async move { self.now(reference, use_utc) })
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> Result<DateTime<FixedOffset>> {
        (**self).now(reference, use_utc)
    }

    fn now_async(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> BoxFuture<'_, Result<DateTime<FixedOffset>>> {
        (**self).now_async(reference, use_utc)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> Result<DateTime<FixedOffset>> {
        (**self).now(reference, use_utc)
    }

    fn now_async(
        &self,
        reference: Option<DateTime<Utc>>,
        use_utc: Option<bool>,
    ) -> BoxFuture<'_, Result<DateTime<FixedOffset>>> {
        (**self).now_async(reference, use_utc)
    }
}

/// Reads the current UTC time from `clock` as milliseconds since the Unix
/// epoch.
///
/// # Errors
///
/// Propagates any error from the clock.
pub fn unix_millis(clock: &dyn Clock) -> Result<i64> {
    Ok(clock.now(None, Some(true))?.timestamp_millis())
}

/// Reads the current UTC time from `clock` as whole seconds since the Unix
/// epoch.
///
/// # Errors
///
/// Propagates any error from the clock.
pub fn unix_seconds(clock: &dyn Clock) -> Result<i64> {
    Ok(clock.now(None, Some(true))?.timestamp())
}

/// Asynchronous counterpart of [`unix_millis`].
///
/// # Errors
///
/// Propagates any error from the clock.
pub async fn unix_millis_async(clock: &dyn Clock) -> Result<i64> {
    Ok(clock.now_async(None, Some(true)).await?.timestamp_millis())
}

/// Asynchronous counterpart of [`unix_seconds`].
///
/// # Errors
///
/// Propagates any error from the clock.
pub async fn unix_seconds_async(clock: &dyn Clock) -> Result<i64> {
    Ok(clock.now_async(None, Some(true)).await?.timestamp())
}
