use core::cmp::Ordering;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdentificationGenerator, Mutex},
    id::{
        MAX_DATA_CENTER_ID, MAX_MACHINE_ID, MAX_TIMESTAMP, SEQUENCE_MASK, SNOWFLAKE_EPOCH_MS,
        SnowflakeParts, TIMESTAMP_BITS,
    },
    time::{Clock, unix_millis, unix_millis_async},
};

/// The mutable half of a Snowflake generator: the last timestamp handed out
/// (milliseconds since [`SNOWFLAKE_EPOCH_MS`]) and the sequence issued within
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SequenceState {
    last_timestamp: i64,
    sequence: i64,
}

/// A lock-based Snowflake id generator suitable for multi-threaded
/// environments.
///
/// Ids are 64-bit signed integers made of a millisecond timestamp, a 4-bit
/// data-center id, a 4-bit machine id, and a 10-bit per-millisecond sequence
/// (see [`SnowflakeParts`]). Every instance owns its own mutex, held for the
/// whole "read clock → compute → store" step, so ids returned by one instance
/// are strictly increasing. Instances never share a lock; ordering across
/// instances holds at millisecond granularity only.
///
/// When 1024 ids have been issued within one millisecond the generator
/// busy-polls the clock, still holding its lock, until the next millisecond
/// begins.
///
/// # Example
/// ```
/// use idweave::{MonotonicClock, SnowflakeIdentificationGenerator};
///
/// let generator = SnowflakeIdentificationGenerator::new(1, 2).unwrap();
/// let clock = MonotonicClock::default();
///
/// let first = generator.generate_id(&clock).unwrap();
/// let second = generator.generate_id(&clock).unwrap();
/// assert!(second > first);
///
/// let parts = SnowflakeIdentificationGenerator::decompose(second);
/// assert_eq!((parts.machine_id, parts.data_center_id), (1, 2));
/// ```
pub struct SnowflakeIdentificationGenerator {
    machine_id: u8,
    data_center_id: u8,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<SequenceState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<SequenceState>,
}

impl SnowflakeIdentificationGenerator {
    /// Creates a new generator for the given shard pair.
    ///
    /// # Errors
    ///
    /// - [`Error::MachineIdOutOfRange`] if `machine_id > 15`
    /// - [`Error::DataCenterIdOutOfRange`] if `data_center_id > 15`
    pub fn new(machine_id: u8, data_center_id: u8) -> Result<Self> {
        Self::from_components(machine_id, data_center_id, -1, 0)
    }

    /// Creates a generator from explicit state.
    ///
    /// This constructor is primarily useful for restoring the last issued
    /// `(timestamp, sequence)` pair from persistent storage, so a restarted
    /// process cannot reissue ids. `last_timestamp` counts milliseconds since
    /// [`SNOWFLAKE_EPOCH_MS`]; `sequence` is masked to 10 bits.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_components(
        machine_id: u8,
        data_center_id: u8,
        last_timestamp: i64,
        sequence: i64,
    ) -> Result<Self> {
        if machine_id > MAX_MACHINE_ID {
            return Err(Error::MachineIdOutOfRange {
                value: machine_id,
                max: MAX_MACHINE_ID,
            });
        }
        if data_center_id > MAX_DATA_CENTER_ID {
            return Err(Error::DataCenterIdOutOfRange {
                value: data_center_id,
                max: MAX_DATA_CENTER_ID,
            });
        }

        let state = SequenceState {
            last_timestamp,
            sequence: sequence & SEQUENCE_MASK,
        };
        Ok(Self {
            machine_id,
            data_center_id,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(state),
        })
    }

    /// The machine id encoded into every id.
    pub const fn machine_id(&self) -> u8 {
        self.machine_id
    }

    /// The data-center id encoded into every id.
    pub const fn data_center_id(&self) -> u8 {
        self.data_center_id
    }

    /// Splits an id produced by any Snowflake generator into its fields.
    pub const fn decompose(id: i64) -> SnowflakeParts {
        SnowflakeParts::from_id(id)
    }

    /// Generates the next id.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the clock reports an earlier
    ///   millisecond than the last id used. This is never corrected here and
    ///   should not be retried blindly.
    /// - [`Error::ClockBeforeEpoch`] / [`Error::TimestampOverflow`] if the
    ///   clock reading cannot be encoded.
    /// - [`Error::LockPoisoned`] if another thread panicked while generating
    ///   (std mutex only).
    /// - Any error reported by `clock`.
    ///
    /// None of these leave the generator's state modified.
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock)))]
    pub fn generate_id(&self, clock: &dyn Clock) -> Result<i64> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = Self::epoch_millis(clock)?;
        self.advance(&mut state, now, clock)
    }

    /// Generates the next id, reading the clock asynchronously.
    ///
    /// Cancellation is checked before the clock is awaited and again before
    /// the lock is taken; a cancelled call leaves the state untouched. The
    /// clock is awaited outside the lock. If, by the time the lock is held,
    /// another caller has already issued ids for a later millisecond, the
    /// reading is stale and the clock is re-read under the lock instead of
    /// reporting a regression.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`], plus [`Error::Cancelled`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock, cancel)))]
    pub async fn generate_id_async(
        &self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<i64> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let observed = Self::since_epoch(unix_millis_async(clock).await?)?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = if observed < state.last_timestamp {
            Self::epoch_millis(clock)?
        } else {
            observed
        };
        self.advance(&mut state, now, clock)
    }

    /// Applies one clock reading to the state and composes the id. Nothing is
    /// written unless an id is returned.
    fn advance(&self, state: &mut SequenceState, now: i64, clock: &dyn Clock) -> Result<i64> {
        let (timestamp, sequence) = match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                let sequence = (state.sequence + 1) & SEQUENCE_MASK;
                if sequence == 0 {
                    (Self::cold_wait_next_millis(state.last_timestamp, clock)?, 0)
                } else {
                    (now, sequence)
                }
            }
            Ordering::Greater => (now, 0),
            Ordering::Less => return Err(Self::cold_clock_behind(state.last_timestamp, now)),
        };

        state.last_timestamp = timestamp;
        state.sequence = sequence;

        Ok(SnowflakeParts {
            timestamp,
            data_center_id: self.data_center_id,
            machine_id: self.machine_id,
            sequence: sequence as u16,
        }
        .compose())
    }

    /// Busy-polls the clock until it reports a millisecond after `last`.
    ///
    /// This deliberately spins rather than yielding: the wait is bounded by
    /// the clock's millisecond granularity.
    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis(last: i64, clock: &dyn Clock) -> Result<i64> {
        #[cfg(feature = "tracing")]
        tracing::trace!(last, "sequence exhausted, spinning until next millisecond");

        loop {
            core::hint::spin_loop();
            let now = Self::epoch_millis(clock)?;
            match now.cmp(&last) {
                Ordering::Greater => return Ok(now),
                Ordering::Equal => {}
                Ordering::Less => return Err(Self::cold_clock_behind(last, now)),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: i64, now: i64) -> Error {
        let err = Error::ClockMovedBackwards {
            last_ms: last + SNOWFLAKE_EPOCH_MS,
            now_ms: now + SNOWFLAKE_EPOCH_MS,
        };
        #[cfg(feature = "tracing")]
        tracing::warn!(%err, "refusing to generate snowflake id");
        err
    }

    fn epoch_millis(clock: &dyn Clock) -> Result<i64> {
        Self::since_epoch(unix_millis(clock)?)
    }

    fn since_epoch(unix_ms: i64) -> Result<i64> {
        let timestamp = unix_ms - SNOWFLAKE_EPOCH_MS;
        if timestamp < 0 {
            return Err(Error::ClockBeforeEpoch {
                now_ms: unix_ms,
                epoch_ms: SNOWFLAKE_EPOCH_MS,
            });
        }
        if timestamp > MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow {
                value: timestamp,
                bits: TIMESTAMP_BITS as u8,
            });
        }
        Ok(timestamp)
    }
}

impl Default for SnowflakeIdentificationGenerator {
    /// A generator for machine id 0 in data center 0.
    fn default() -> Self {
        let state = SequenceState {
            last_timestamp: -1,
            sequence: 0,
        };
        Self {
            machine_id: 0,
            data_center_id: 0,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(state),
        }
    }
}

impl IdentificationGenerator<i64> for SnowflakeIdentificationGenerator {
    fn generate_id(&self, clock: &dyn Clock) -> Result<i64> {
        Self::generate_id(self, clock)
    }

    fn generate_id_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<i64>> {
        Box::pin(Self::generate_id_async(self, clock, cancel))
    }
}
