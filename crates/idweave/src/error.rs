/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `idweave` can produce.
///
/// Errors fall into a handful of groups:
/// - configuration errors, raised at construction or call time for values
///   outside the accepted ranges,
/// - clock errors, raised when the clock reports a time the generator cannot
///   encode or that moved backwards,
/// - parse errors for ObjectId strings,
/// - lookup errors from the [`GeneratorRegistry`].
///
/// None of them are retried internally. A failing call never leaves partial
/// state behind: validation and clock checks run before any generator state is
/// written.
///
/// [`GeneratorRegistry`]: crate::GeneratorRegistry
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The Snowflake machine id does not fit its 4-bit field.
    #[error("machine id {value} is out of range (expected 0..={max})")]
    MachineIdOutOfRange { value: u8, max: u8 },

    /// The Snowflake data-center id does not fit its 4-bit field.
    #[error("data-center id {value} is out of range (expected 0..={max})")]
    DataCenterIdOutOfRange { value: u8, max: u8 },

    /// The clock reported a time earlier than the last one observed by a
    /// Snowflake generator.
    ///
    /// Callers should not retry immediately: the underlying clock condition
    /// will most likely still hold.
    #[error("clock moved backwards: last timestamp {last_ms}ms, now {now_ms}ms")]
    ClockMovedBackwards { last_ms: i64, now_ms: i64 },

    /// The clock reported a time before the generator's epoch.
    #[error("clock reading {now_ms}ms (unix) is before the epoch {epoch_ms}ms")]
    ClockBeforeEpoch { now_ms: i64, epoch_ms: i64 },

    /// The clock reported a time that no longer fits the id's timestamp
    /// field.
    #[error("timestamp {value} overflows the {bits}-bit timestamp field")]
    TimestampOverflow { value: i64, bits: u8 },

    /// A clock implementation failed to produce a reading.
    #[error("clock unavailable: {reason}")]
    ClockUnavailable { reason: String },

    /// `short_length` is outside `min..=max` for the generated id.
    #[error("short length {requested} is out of range (expected {min}..={max})")]
    ShortLengthOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// A numeral system was requested with an unsupported radix.
    #[error("radix {radix} is out of range (expected 2..={max})")]
    InvalidRadix { radix: usize, max: usize },

    /// A custom numeral alphabet was rejected.
    #[error("invalid numeral alphabet: {reason}")]
    InvalidAlphabet { reason: &'static str },

    /// An ObjectId string does not have exactly 24 characters.
    #[error("invalid ObjectId length {len} (expected 24)")]
    InvalidObjectIdLength { len: usize },

    /// An ObjectId string contains a character outside `[0-9a-fA-F]`.
    #[error("invalid ObjectId character {character:?} at index {index}")]
    InvalidObjectIdHex { character: char, index: usize },

    /// No generator is registered for the requested identifier type.
    #[error("no generator registered for identifier type `{type_name}`")]
    GeneratorNotRegistered { type_name: &'static str },

    /// A generator was registered twice for the same identifier type.
    #[error("a generator is already registered for identifier type `{type_name}`")]
    DuplicateRegistration { type_name: &'static str },

    /// The async call was cancelled before any state was touched.
    #[error("id generation was cancelled")]
    Cancelled,

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
