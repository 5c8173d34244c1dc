mod config;
mod kind;
mod object;
#[cfg(test)]
mod tests;

use std::{collections::HashMap, sync::Arc};

pub use config::*;
pub use kind::*;
pub use object::*;

use crate::{
    error::{Error, Result},
    generator::IdentificationGenerator,
};

/// Maps identifier types to the generator that produces them.
///
/// A registry is built once, either explicitly through
/// [`GeneratorRegistry::builder`] or from an
/// [`IdentificationGeneratorsConfiguration`], and is read-only afterwards, so
/// lookups need no synchronization.
///
/// # Example
/// ```
/// use idweave::{GeneratorRegistry, IdType, SystemClock, Uuid};
///
/// let registry = GeneratorRegistry::from_configuration(Default::default());
///
/// let guids = registry.get_generator::<Uuid>().unwrap();
/// let id = guids.generate_id(&SystemClock::default()).unwrap();
/// assert_eq!(id.to_string().len(), 36);
///
/// let ints = registry.get_generator_by_type(IdType::of::<i64>()).unwrap();
/// assert_eq!(ints.id_type(), IdType::of::<i64>());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<IdType, RegisteredGenerator>,
}

impl GeneratorRegistry {
    pub fn builder() -> GeneratorRegistryBuilder {
        GeneratorRegistryBuilder::default()
    }

    /// Builds a registry from the configuration's filled slots.
    pub fn from_configuration(configuration: IdentificationGeneratorsConfiguration) -> Self {
        let IdentificationGeneratorsConfiguration {
            int64,
            guid,
            object_id,
            string,
        } = configuration;

        let generators = [
            int64.map(RegisteredGenerator::Int64),
            guid.map(RegisteredGenerator::Guid),
            object_id.map(RegisteredGenerator::ObjectId),
            string.map(RegisteredGenerator::String),
        ]
        .into_iter()
        .flatten()
        .map(|generator| {
            log_registration(&generator);
            (generator.id_type(), generator)
        })
        .collect();

        Self { generators }
    }

    /// The generator registered for `T`.
    ///
    /// # Errors
    ///
    /// [`Error::GeneratorNotRegistered`] if nothing is registered for `T`.
    pub fn get_generator<T: IdentifierKind>(&self) -> Result<&Arc<dyn IdentificationGenerator<T>>> {
        // Entries are keyed by their variant's own type, so `select` only
        // misses when the key is absent.
        let requested = IdType::of::<T>();
        self.generators
            .get(&requested)
            .and_then(T::select)
            .ok_or(Error::GeneratorNotRegistered {
                type_name: requested.name(),
            })
    }

    /// The generator registered for `id_type`, behind the type-erased
    /// [`ObjectGenerator`] view.
    ///
    /// # Errors
    ///
    /// [`Error::GeneratorNotRegistered`] if nothing is registered for
    /// `id_type`, including types outside the supported identifier kinds.
    pub fn get_generator_by_type(&self, id_type: IdType) -> Result<&dyn ObjectGenerator> {
        let generator: &dyn ObjectGenerator = self.lookup(id_type)?;
        Ok(generator)
    }

    pub fn contains(&self, id_type: IdType) -> bool {
        self.generators.contains_key(&id_type)
    }

    /// The registered identifier types, in no particular order.
    pub fn id_types(&self) -> impl Iterator<Item = IdType> + '_ {
        self.generators.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    fn lookup(&self, id_type: IdType) -> Result<&RegisteredGenerator> {
        self.generators
            .get(&id_type)
            .ok_or(Error::GeneratorNotRegistered {
                type_name: id_type.name(),
            })
    }
}

/// Collects `(identifier type, generator)` pairs for a [`GeneratorRegistry`].
#[derive(Debug, Default)]
pub struct GeneratorRegistryBuilder {
    generators: Vec<RegisteredGenerator>,
}

impl GeneratorRegistryBuilder {
    /// Registers `generator` for identifier type `T`.
    #[must_use]
    pub fn register<T: IdentifierKind>(self, generator: Arc<dyn IdentificationGenerator<T>>) -> Self {
        self.register_generator(T::wrap(generator))
    }

    /// Registers an already wrapped generator under its own identifier type.
    #[must_use]
    pub fn register_generator(mut self, generator: RegisteredGenerator) -> Self {
        self.generators.push(generator);
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateRegistration`] if two generators were registered
    /// for the same identifier type.
    pub fn build(self) -> Result<GeneratorRegistry> {
        let mut generators = HashMap::with_capacity(self.generators.len());
        for generator in self.generators {
            let id_type = generator.id_type();
            if generators.contains_key(&id_type) {
                return Err(Error::DuplicateRegistration {
                    type_name: id_type.name(),
                });
            }
            log_registration(&generator);
            generators.insert(id_type, generator);
        }
        Ok(GeneratorRegistry { generators })
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_registration(generator: &RegisteredGenerator) {
    #[cfg(feature = "tracing")]
    tracing::debug!(id_type = %generator.id_type(), "registered identifier generator");
}
