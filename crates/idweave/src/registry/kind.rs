use core::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};
use std::sync::Arc;

use uuid::Uuid;

use crate::{generator::IdentificationGenerator, id::ObjectIdDescriptor};

/// A runtime handle for an identifier type, used as the registry key.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// error messages.
#[derive(Clone, Copy)]
pub struct IdType {
    id: TypeId,
    name: &'static str,
}

impl IdType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The Rust type name, as reported by [`core::any::type_name`].
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for IdType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IdType {}

impl Hash for IdType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdType").field(&self.name).finish()
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A generator for one of the supported identifier kinds.
///
/// The set is closed: every generator the registry can hold produces one of
/// these four identifier types.
#[derive(Clone)]
pub enum RegisteredGenerator {
    Int64(Arc<dyn IdentificationGenerator<i64>>),
    Guid(Arc<dyn IdentificationGenerator<Uuid>>),
    ObjectId(Arc<dyn IdentificationGenerator<ObjectIdDescriptor>>),
    String(Arc<dyn IdentificationGenerator<String>>),
}

impl RegisteredGenerator {
    /// The identifier type this generator produces.
    pub fn id_type(&self) -> IdType {
        match self {
            Self::Int64(_) => IdType::of::<i64>(),
            Self::Guid(_) => IdType::of::<Uuid>(),
            Self::ObjectId(_) => IdType::of::<ObjectIdDescriptor>(),
            Self::String(_) => IdType::of::<String>(),
        }
    }
}

impl fmt::Debug for RegisteredGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegisteredGenerator")
            .field(&self.id_type())
            .finish()
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for uuid::Uuid {}
    impl Sealed for crate::id::ObjectIdDescriptor {}
    impl Sealed for String {}
}

/// An identifier type the registry knows how to store.
///
/// Implemented for `i64`, [`Uuid`], [`ObjectIdDescriptor`] and `String`.
/// Each kind maps to exactly one [`RegisteredGenerator`] variant, so typed
/// lookups select a variant instead of downcasting.
pub trait IdentifierKind: sealed::Sealed + Send + Sized + 'static {
    fn wrap(generator: Arc<dyn IdentificationGenerator<Self>>) -> RegisteredGenerator;

    fn select(generator: &RegisteredGenerator) -> Option<&Arc<dyn IdentificationGenerator<Self>>>;
}

macro_rules! impl_identifier_kind {
    ($ty:ty, $variant:ident) => {
        impl IdentifierKind for $ty {
            fn wrap(generator: Arc<dyn IdentificationGenerator<Self>>) -> RegisteredGenerator {
                RegisteredGenerator::$variant(generator)
            }

            fn select(
                generator: &RegisteredGenerator,
            ) -> Option<&Arc<dyn IdentificationGenerator<Self>>> {
                match generator {
                    RegisteredGenerator::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_identifier_kind!(i64, Int64);
impl_identifier_kind!(Uuid, Guid);
impl_identifier_kind!(ObjectIdDescriptor, ObjectId);
impl_identifier_kind!(String, String);
