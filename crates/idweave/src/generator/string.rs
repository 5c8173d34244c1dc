use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdentificationGenerator, SnowflakeIdentificationGenerator},
    numeral::NumeralSystem,
    time::Clock,
};

/// Shortest accepted `short_length` for
/// [`StringIdentityGenerator::generate_short_id`].
pub const MIN_SHORT_ID_LENGTH: usize = 6;

/// Renders ids from an inner `i64` generator as compact strings.
///
/// The inner generator (a Snowflake generator for machine 0 in data center 0
/// by default) supplies uniqueness; the [`NumeralSystem`] only changes the
/// rendering. Rendering is one-way.
///
/// # Example
/// ```
/// use idweave::{MonotonicClock, StringIdentityGenerator};
///
/// let generator = StringIdentityGenerator::default();
/// let clock = MonotonicClock::default();
///
/// let id = generator.generate_id(&clock).unwrap();
/// assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
///
/// let short = generator.generate_short_id(&clock, 8).unwrap();
/// assert_eq!(short.len(), 8);
/// ```
#[derive(Clone)]
pub struct StringIdentityGenerator {
    inner: Arc<dyn IdentificationGenerator<i64>>,
    numeral: NumeralSystem,
    max_length: usize,
}

impl StringIdentityGenerator {
    pub fn new(inner: Arc<dyn IdentificationGenerator<i64>>, numeral: NumeralSystem) -> Self {
        // i64::MIN has the largest magnitude and carries the sign.
        let max_length = numeral.encode(i64::MIN).len();
        Self {
            inner,
            numeral,
            max_length,
        }
    }

    pub fn numeral(&self) -> &NumeralSystem {
        &self.numeral
    }

    /// Generates an id from the inner generator and renders it.
    ///
    /// # Errors
    ///
    /// Any error from the inner generator.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock)))]
    pub fn generate_id(&self, clock: &dyn Clock) -> Result<String> {
        Ok(self.numeral.encode(self.inner.generate_id(clock)?))
    }

    /// Generates an id and keeps its trailing `short_length` characters.
    ///
    /// The trailing characters carry the fast-moving low bits (the Snowflake
    /// sequence and shard ids), but dropping the leading ones still weakens
    /// uniqueness: two short ids can collide where the full ids would not.
    ///
    /// # Errors
    ///
    /// - [`Error::ShortLengthOutOfRange`] if `short_length` is below
    ///   [`MIN_SHORT_ID_LENGTH`] or longer than the rendered id. Lengths that
    ///   no rendering could satisfy are rejected before the inner generator
    ///   runs.
    /// - Any error from the inner generator.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, clock)))]
    pub fn generate_short_id(&self, clock: &dyn Clock, short_length: usize) -> Result<String> {
        self.check_short_length(short_length)?;
        let full = self.generate_id(clock)?;
        Self::shorten(full, short_length)
    }

    /// Asynchronous counterpart of [`Self::generate_id`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`], plus [`Error::Cancelled`].
    pub async fn generate_id_async(
        &self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let id = self.inner.generate_id_async(clock, cancel).await?;
        Ok(self.numeral.encode(id))
    }

    /// Asynchronous counterpart of [`Self::generate_short_id`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_short_id`], plus [`Error::Cancelled`].
    pub async fn generate_short_id_async(
        &self,
        clock: &dyn Clock,
        short_length: usize,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_short_length(short_length)?;
        let full = self.generate_id_async(clock, cancel).await?;
        Self::shorten(full, short_length)
    }

    fn check_short_length(&self, short_length: usize) -> Result<()> {
        if (MIN_SHORT_ID_LENGTH..=self.max_length).contains(&short_length) {
            Ok(())
        } else {
            Err(Error::ShortLengthOutOfRange {
                requested: short_length,
                min: MIN_SHORT_ID_LENGTH,
                max: self.max_length,
            })
        }
    }

    fn shorten(mut full: String, short_length: usize) -> Result<String> {
        let Some(start) = full.len().checked_sub(short_length) else {
            return Err(Error::ShortLengthOutOfRange {
                requested: short_length,
                min: MIN_SHORT_ID_LENGTH,
                max: full.len(),
            });
        };
        // Rendered digits are ASCII, so any byte offset is a char boundary.
        Ok(full.split_off(start))
    }
}

impl Default for StringIdentityGenerator {
    /// Radix-52 renderings of a Snowflake generator for machine 0 in data
    /// center 0.
    fn default() -> Self {
        Self::new(
            Arc::new(SnowflakeIdentificationGenerator::default()),
            NumeralSystem::default(),
        )
    }
}

impl core::fmt::Debug for StringIdentityGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StringIdentityGenerator")
            .field("radix", &self.numeral.radix())
            .finish_non_exhaustive()
    }
}

impl IdentificationGenerator<String> for StringIdentityGenerator {
    fn generate_id(&self, clock: &dyn Clock) -> Result<String> {
        Self::generate_id(self, clock)
    }

    fn generate_id_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(Self::generate_id_async(self, clock, cancel))
    }
}
