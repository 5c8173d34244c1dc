use core::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    generator::{
        CombIdentificationGenerator, IdentificationGenerator, MongoIdentificationGenerator,
        SnowflakeIdentificationGenerator, StringIdentityGenerator,
    },
    id::{CombGenerationMode, ObjectIdDescriptor},
    numeral::NumeralSystem,
};

/// One generator slot per identifier kind, consumed by
/// [`GeneratorRegistry::from_configuration`].
///
/// Empty slots are simply not registered.
///
/// [`GeneratorRegistry::from_configuration`]: crate::GeneratorRegistry::from_configuration
#[derive(Clone)]
pub struct IdentificationGeneratorsConfiguration {
    pub int64: Option<Arc<dyn IdentificationGenerator<i64>>>,
    pub guid: Option<Arc<dyn IdentificationGenerator<Uuid>>>,
    pub object_id: Option<Arc<dyn IdentificationGenerator<ObjectIdDescriptor>>>,
    pub string: Option<Arc<dyn IdentificationGenerator<String>>>,
}

impl IdentificationGeneratorsConfiguration {
    /// A configuration with every slot empty.
    pub const fn empty() -> Self {
        Self {
            int64: None,
            guid: None,
            object_id: None,
            string: None,
        }
    }
}

impl Default for IdentificationGeneratorsConfiguration {
    /// Every slot filled:
    /// - `i64`: Snowflake, machine 0 in data center 0
    /// - `Uuid`: COMB in [`CombGenerationMode::AtEnd`]
    /// - `ObjectIdDescriptor`: ObjectIds for the running process
    /// - `String`: radix-52 renderings of the `i64` generator
    ///
    /// The string generator shares the `i64` generator so the two kinds never
    /// hand out the same underlying value.
    fn default() -> Self {
        let int64: Arc<dyn IdentificationGenerator<i64>> =
            Arc::new(SnowflakeIdentificationGenerator::default());
        let string = StringIdentityGenerator::new(Arc::clone(&int64), NumeralSystem::default());

        Self {
            int64: Some(int64),
            guid: Some(Arc::new(CombIdentificationGenerator::new(
                CombGenerationMode::AtEnd,
            ))),
            object_id: Some(Arc::new(MongoIdentificationGenerator::new())),
            string: Some(Arc::new(string)),
        }
    }
}

impl fmt::Debug for IdentificationGeneratorsConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentificationGeneratorsConfiguration")
            .field("int64", &self.int64.is_some())
            .field("guid", &self.guid.is_some())
            .field("object_id", &self.object_id.is_some())
            .field("string", &self.string.is_some())
            .finish()
    }
}
