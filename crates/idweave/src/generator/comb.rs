use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    generator::IdentificationGenerator,
    id::{COMB_RANDOM_LEN, CombGenerationMode, timestamp_bytes},
    rand::{RandSource, ThreadRandom},
    time::{Clock, unix_millis, unix_millis_async},
};

/// Generates COMB GUIDs: 10 random bytes combined with a 6-byte millisecond
/// timestamp, placed so the target database sorts them by creation time.
///
/// The generator holds no mutable state. Ids created within the same
/// millisecond are distinguished only by their random bytes and are not
/// ordered relative to each other.
///
/// # Example
/// ```
/// use idweave::{CombGenerationMode, CombIdentificationGenerator, SystemClock};
///
/// let generator = CombIdentificationGenerator::new(CombGenerationMode::AsString);
/// let id = generator.generate_id(&SystemClock::default()).unwrap();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CombIdentificationGenerator<R = ThreadRandom>
where
    R: RandSource<[u8; COMB_RANDOM_LEN]>,
{
    mode: CombGenerationMode,
    rng: R,
}

impl CombIdentificationGenerator<ThreadRandom> {
    /// Creates a generator for `mode`, drawing random bytes from the
    /// thread-local RNG.
    pub const fn new(mode: CombGenerationMode) -> Self {
        Self {
            mode,
            rng: ThreadRandom,
        }
    }
}

impl<R> CombIdentificationGenerator<R>
where
    R: RandSource<[u8; COMB_RANDOM_LEN]>,
{
    /// Creates a generator for `mode` with a custom random source.
    pub const fn with_rng(mode: CombGenerationMode, rng: R) -> Self {
        Self { mode, rng }
    }

    /// The byte layout this generator produces.
    pub const fn mode(&self) -> CombGenerationMode {
        self.mode
    }

    /// Generates a COMB id stamped with the clock's current UTC millisecond.
    ///
    /// # Errors
    ///
    /// Propagates any error from `clock`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock)))]
    pub fn generate_id(&self, clock: &dyn Clock) -> Result<Uuid> {
        let unix_ms = unix_millis(clock)?;
        Ok(self.stamp(unix_ms))
    }

    /// Generates a COMB id, reading the clock asynchronously.
    ///
    /// # Errors
    ///
    /// [`Error::Cancelled`] if `cancel` fires before the clock is read, or any
    /// error from `clock`.
    pub async fn generate_id_async(
        &self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<Uuid> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let unix_ms = unix_millis_async(clock).await?;
        Ok(self.stamp(unix_ms))
    }

    fn stamp(&self, unix_ms: i64) -> Uuid {
        self.mode.assemble(timestamp_bytes(unix_ms), self.rng.rand())
    }
}

impl<R> IdentificationGenerator<Uuid> for CombIdentificationGenerator<R>
where
    R: RandSource<[u8; COMB_RANDOM_LEN]>,
{
    fn generate_id(&self, clock: &dyn Clock) -> Result<Uuid> {
        Self::generate_id(self, clock)
    }

    fn generate_id_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Uuid>> {
        Box::pin(Self::generate_id_async(self, clock, cancel))
    }
}
