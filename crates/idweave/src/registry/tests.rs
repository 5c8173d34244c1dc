use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    CombGenerationMode, CombIdentificationGenerator, Error, GeneratedId, GeneratorRegistry,
    IdType, IdentificationGenerator, IdentificationGeneratorsConfiguration,
    MongoIdentificationGenerator, ObjectIdDescriptor, ProcessIdentity, RegisteredGenerator,
    SnowflakeIdentificationGenerator, SnowflakeParts, StringIdentityGenerator,
    test_support::FixedClock,
};

/// An identifier type nothing can be registered for.
struct Decimal;

const NOW_MS: i64 = 1_700_000_000_000;

fn comb() -> Arc<dyn IdentificationGenerator<Uuid>> {
    Arc::new(CombIdentificationGenerator::new(CombGenerationMode::AsBinary))
}

#[test]
fn typed_lookup_returns_the_configured_instance() {
    let guid = comb();
    let registry = GeneratorRegistry::from_configuration(IdentificationGeneratorsConfiguration {
        guid: Some(Arc::clone(&guid)),
        ..Default::default()
    });

    let found = registry.get_generator::<Uuid>().unwrap();
    assert!(Arc::ptr_eq(found, &guid));
}

#[test]
fn unknown_type_is_a_lookup_error() {
    let registry = GeneratorRegistry::from_configuration(Default::default());
    assert_eq!(registry.len(), 4);

    let err = registry
        .get_generator_by_type(IdType::of::<Decimal>())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::GeneratorNotRegistered { type_name } if type_name.ends_with("Decimal")
    ));
}

#[test]
fn every_registered_type_resolves_through_typed_lookup() {
    let registry = GeneratorRegistry::from_configuration(Default::default());
    for id_type in registry.id_types() {
        let resolved = if id_type == IdType::of::<i64>() {
            registry.get_generator::<i64>().is_ok()
        } else if id_type == IdType::of::<Uuid>() {
            registry.get_generator::<Uuid>().is_ok()
        } else if id_type == IdType::of::<ObjectIdDescriptor>() {
            registry.get_generator::<ObjectIdDescriptor>().is_ok()
        } else {
            registry.get_generator::<String>().is_ok()
        };
        assert!(resolved, "{id_type} did not resolve");
    }

    let registry =
        GeneratorRegistry::from_configuration(IdentificationGeneratorsConfiguration::empty());
    assert!(matches!(
        registry.get_generator::<i64>().err(),
        Some(Error::GeneratorNotRegistered { type_name }) if type_name == "i64"
    ));
}

#[test]
fn empty_slots_are_not_registered() {
    let registry = GeneratorRegistry::from_configuration(IdentificationGeneratorsConfiguration {
        int64: Some(Arc::new(SnowflakeIdentificationGenerator::default())),
        ..IdentificationGeneratorsConfiguration::empty()
    });

    assert_eq!(registry.len(), 1);
    assert!(registry.contains(IdType::of::<i64>()));
    assert!(matches!(
        registry.get_generator::<String>().err(),
        Some(Error::GeneratorNotRegistered { type_name }) if type_name.ends_with("String")
    ));
}

#[test]
fn builder_registers_each_kind() {
    let identity = ProcessIdentity::new([1, 2, 3], 4);
    let registry = GeneratorRegistry::builder()
        .register::<i64>(Arc::new(SnowflakeIdentificationGenerator::new(3, 1).unwrap()))
        .register::<Uuid>(comb())
        .register::<ObjectIdDescriptor>(Arc::new(MongoIdentificationGenerator::with_identity(
            identity,
        )))
        .register::<String>(Arc::new(StringIdentityGenerator::default()))
        .build()
        .unwrap();

    let clock = FixedClock(NOW_MS);
    let id = registry.get_generator::<i64>().unwrap().generate_id(&clock).unwrap();
    assert_eq!(SnowflakeParts::from_id(id).machine_id, 3);

    let object_id = registry
        .get_generator::<ObjectIdDescriptor>()
        .unwrap()
        .generate_id(&clock)
        .unwrap();
    assert_eq!(object_id.machine_id(), 0x0001_0203);

    assert_eq!(registry.id_types().count(), 4);
}

#[test]
fn duplicate_registration_fails_build() {
    let result = GeneratorRegistry::builder()
        .register::<Uuid>(comb())
        .register_generator(RegisteredGenerator::Guid(comb()))
        .build();
    assert!(matches!(
        result.err(),
        Some(Error::DuplicateRegistration { type_name }) if type_name.ends_with("Uuid")
    ));
}

#[test]
fn type_erased_generation_matches_kind() {
    let registry = GeneratorRegistry::from_configuration(Default::default());
    let clock = FixedClock(NOW_MS);

    for id_type in [
        IdType::of::<i64>(),
        IdType::of::<Uuid>(),
        IdType::of::<ObjectIdDescriptor>(),
        IdType::of::<String>(),
    ] {
        let generator = registry.get_generator_by_type(id_type).unwrap();
        assert_eq!(generator.id_type(), id_type);
        let id = generator.generate_object(&clock).unwrap();
        assert_eq!(id.id_type(), id_type);
        assert!(!id.to_string().is_empty());
    }
}

#[test]
fn default_string_generator_shares_the_int64_generator() {
    let registry = GeneratorRegistry::from_configuration(Default::default());
    let clock = FixedClock(NOW_MS);

    registry.get_generator::<i64>().unwrap().generate_id(&clock).unwrap();
    // Sequence 0 of this millisecond went to the i64 lookup.
    let int_id = SnowflakeParts {
        timestamp: NOW_MS - crate::SNOWFLAKE_EPOCH_MS,
        data_center_id: 0,
        machine_id: 0,
        sequence: 1,
    }
    .compose();
    let rendered = registry.get_generator::<String>().unwrap().generate_id(&clock).unwrap();
    assert_eq!(rendered, crate::NumeralSystem::default().encode(int_id));
}

#[test]
fn generated_id_displays_inner_value() {
    assert_eq!(GeneratedId::from(42_i64).to_string(), "42");
    assert_eq!(
        GeneratedId::from(ObjectIdDescriptor::EMPTY).to_string(),
        "000000000000000000000000"
    );
    assert_eq!(GeneratedId::from(Uuid::nil()).to_string(), Uuid::nil().to_string());
    assert_eq!(GeneratedId::from("abc".to_owned()).to_string(), "abc");
}

#[tokio::test]
async fn type_erased_async_generation_honours_cancellation() {
    let registry = GeneratorRegistry::from_configuration(Default::default());
    let generator = registry.get_generator_by_type(IdType::of::<i64>()).unwrap();
    let clock = FixedClock(NOW_MS);

    let cancel = CancellationToken::new();
    let id = generator.generate_object_async(&clock, &cancel).await.unwrap();
    assert!(matches!(id, GeneratedId::Int64(_)));

    cancel.cancel();
    assert_eq!(
        generator.generate_object_async(&clock, &cancel).await,
        Err(Error::Cancelled)
    );
}
