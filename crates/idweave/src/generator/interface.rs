use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    time::Clock,
};

/// The contract shared by every generator: given a clock, produce the next
/// identifier of type `TId`.
///
/// Implementations are long-lived and shared across threads, so all methods
/// take `&self`.
pub trait IdentificationGenerator<TId: Send + 'static>: Send + Sync {
    /// Generates the next identifier.
    ///
    /// # Errors
    ///
    /// Returns the generator's configuration or clock errors, or any error
    /// reported by `clock`.
    fn generate_id(&self, clock: &dyn Clock) -> Result<TId>;

    /// Generates the next identifier asynchronously.
    ///
    /// `cancel` is observed before any generator state is touched: a
    /// cancelled call fails with [`Error::Cancelled`] and leaves the generator
    /// exactly as it was. The default resolves with [`Self::generate_id`];
    /// generators that read the clock asynchronously override it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`], plus [`Error::Cancelled`].
    fn generate_id_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<TId>> {
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.generate_id(clock)
        })
    }
}
