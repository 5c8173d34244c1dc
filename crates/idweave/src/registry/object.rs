use core::fmt;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::Result,
    id::ObjectIdDescriptor,
    registry::{IdType, RegisteredGenerator},
    time::Clock,
};

/// An identifier produced through the type-erased [`ObjectGenerator`] view.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneratedId {
    Int64(i64),
    Guid(Uuid),
    ObjectId(ObjectIdDescriptor),
    String(String),
}

impl GeneratedId {
    /// The identifier type of the wrapped value.
    pub fn id_type(&self) -> IdType {
        match self {
            Self::Int64(_) => IdType::of::<i64>(),
            Self::Guid(_) => IdType::of::<Uuid>(),
            Self::ObjectId(_) => IdType::of::<ObjectIdDescriptor>(),
            Self::String(_) => IdType::of::<String>(),
        }
    }
}

impl fmt::Display for GeneratedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(id) => fmt::Display::fmt(id, f),
            Self::Guid(id) => fmt::Display::fmt(id, f),
            Self::ObjectId(id) => fmt::Display::fmt(id, f),
            Self::String(id) => f.write_str(id),
        }
    }
}

impl From<i64> for GeneratedId {
    fn from(id: i64) -> Self {
        Self::Int64(id)
    }
}

impl From<Uuid> for GeneratedId {
    fn from(id: Uuid) -> Self {
        Self::Guid(id)
    }
}

impl From<ObjectIdDescriptor> for GeneratedId {
    fn from(id: ObjectIdDescriptor) -> Self {
        Self::ObjectId(id)
    }
}

impl From<String> for GeneratedId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

/// A generator whose identifier type is only known at runtime.
///
/// Returned by [`GeneratorRegistry::get_generator_by_type`]; callers that
/// know the type statically should use
/// [`GeneratorRegistry::get_generator`] instead.
///
/// [`GeneratorRegistry::get_generator_by_type`]: crate::GeneratorRegistry::get_generator_by_type
/// [`GeneratorRegistry::get_generator`]: crate::GeneratorRegistry::get_generator
pub trait ObjectGenerator: Send + Sync {
    fn id_type(&self) -> IdType;

    /// Generates the next identifier.
    ///
    /// # Errors
    ///
    /// Whatever the underlying generator reports.
    fn generate_object(&self, clock: &dyn Clock) -> Result<GeneratedId>;

    /// Generates the next identifier asynchronously.
    ///
    /// # Errors
    ///
    /// Whatever the underlying generator reports, including
    /// [`Error::Cancelled`](crate::Error::Cancelled).
    fn generate_object_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<GeneratedId>>;
}

impl ObjectGenerator for RegisteredGenerator {
    fn id_type(&self) -> IdType {
        Self::id_type(self)
    }

    fn generate_object(&self, clock: &dyn Clock) -> Result<GeneratedId> {
        Ok(match self {
            Self::Int64(generator) => generator.generate_id(clock)?.into(),
            Self::Guid(generator) => generator.generate_id(clock)?.into(),
            Self::ObjectId(generator) => generator.generate_id(clock)?.into(),
            Self::String(generator) => generator.generate_id(clock)?.into(),
        })
    }

    fn generate_object_async<'a>(
        &'a self,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<GeneratedId>> {
        Box::pin(async move {
            Ok(match self {
                Self::Int64(generator) => generator.generate_id_async(clock, cancel).await?.into(),
                Self::Guid(generator) => generator.generate_id_async(clock, cancel).await?.into(),
                Self::ObjectId(generator) => {
                    generator.generate_id_async(clock, cancel).await?.into()
                }
                Self::String(generator) => generator.generate_id_async(clock, cancel).await?.into(),
            })
        })
    }
}
