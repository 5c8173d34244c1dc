use core::sync::atomic::Ordering;

use futures::future::BoxFuture;
use portable_atomic::AtomicI32;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdentificationGenerator, ProcessIdentity},
    id::ObjectIdDescriptor,
    rand::{RandSource, ThreadRandom},
    time::{Clock, unix_seconds, unix_seconds_async},
};

/// Generates 12-byte MongoDB-style ObjectIds.
///
/// Each id is `seconds (4) | machine hash (3) | process id (2) | counter (3)`,
/// all big-endian. The counter is owned by the instance, starts at a random
/// value, and is advanced with a single atomic `fetch_add`, so generation is
/// lock-free. Two ids from the same instance within the same second differ in
/// their counter bytes until the 24-bit counter wraps.
///
/// # Example
/// ```
/// use idweave::{MongoIdentificationGenerator, ObjectIdDescriptor, SystemClock};
///
/// let generator = MongoIdentificationGenerator::new();
/// let (hex, descriptor) = generator.generate(&SystemClock::default()).unwrap();
/// assert_eq!(hex.len(), 24);
/// assert_eq!(ObjectIdDescriptor::parse(&hex).unwrap(), descriptor);
/// ```
#[derive(Debug)]
pub struct MongoIdentificationGenerator {
    identity: ProcessIdentity,
    counter: AtomicI32,
}

impl MongoIdentificationGenerator {
    /// A generator for the running process with a randomly seeded counter.
    pub fn new() -> Self {
        Self::with_identity(ProcessIdentity::current())
    }

    /// A generator stamping `identity` into every id, with a randomly seeded
    /// counter.
    pub fn with_identity(identity: ProcessIdentity) -> Self {
        Self::with_counter_seed(identity, RandSource::<i32>::rand(&ThreadRandom))
    }

    /// A generator whose first id carries the low 24 bits of `seed + 1`.
    pub const fn with_counter_seed(identity: ProcessIdentity, seed: i32) -> Self {
        Self {
            identity,
            counter: AtomicI32::new(seed),
        }
    }

    pub const fn identity(&self) -> ProcessIdentity {
        self.identity
    }

    /// Generates the next ObjectId, returning its hex rendering alongside the
    /// decomposed descriptor.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] if the clock's Unix seconds do not fit
    ///   in 32 unsigned bits.
    /// - Any error reported by `clock`.
    ///
    /// The counter is only advanced once the clock reading is known to be
    /// usable.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock)))]
    pub fn generate(&self, clock: &dyn Clock) -> Result<(String, ObjectIdDescriptor)> {
        let descriptor = self.stamp(unix_seconds(clock)?)?;
        Ok((descriptor.to_hex(), descriptor))
    }

    /// Generates the next ObjectId descriptor.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`].
    pub fn generate_id(&self, clock: &dyn Clock) -> Result<ObjectIdDescriptor> {
        self.stamp(unix_seconds(clock)?)
    }

    /// Generates the next ObjectId descriptor, reading the clock
    /// asynchronously.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`], plus [`Error::Cancelled`] if `cancel` has
    /// fired before the counter is advanced. A cancelled call leaves the
    /// counter untouched.
    pub async fn generate_id_async(
        &self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<ObjectIdDescriptor> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let seconds = unix_seconds_async(clock).await?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.stamp(seconds)
    }

    fn stamp(&self, unix_seconds: i64) -> Result<ObjectIdDescriptor> {
        let seconds = u32::try_from(unix_seconds).map_err(|_| Error::TimestampOverflow {
            value: unix_seconds,
            bits: 32,
        })?;
        let increment = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);

        Ok(ObjectIdDescriptor::from_parts(
            seconds,
            self.identity.machine_hash(),
            self.identity.process_id(),
            increment as u32,
        ))
    }
}

impl Default for MongoIdentificationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentificationGenerator<ObjectIdDescriptor> for MongoIdentificationGenerator {
    fn generate_id(&self, clock: &dyn Clock) -> Result<ObjectIdDescriptor> {
        Self::generate_id(self, clock)
    }

    fn generate_id_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<ObjectIdDescriptor>> {
        Box::pin(Self::generate_id_async(self, clock, cancel))
    }
}
