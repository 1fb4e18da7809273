// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unwrap_used)] // Tests panic on failure
#![allow(clippy::uninlined_format_args)] // Test readability over pedantic

//! Serializer lifecycle of state descriptors across persistence round-trips.

use keyed_state::serializer::{GenericSerializer, StringSerializer};
use keyed_state::{
    ExecutionConfig, StateDescriptor, StateError, StateValue, TypeInformation, TypeSerializer,
    TypeToken,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoragePath {
    segments: Vec<String>,
}

/// Auxiliary type only ever mentioned through configuration.
#[allow(dead_code)]
struct FileHandle;

fn copy<V: StateValue>(descriptor: &StateDescriptor<V>) -> StateDescriptor<V> {
    let json = serde_json::to_string(descriptor).expect("descriptor should serialize");
    serde_json::from_str(&json).expect("descriptor should deserialize")
}

fn is_string_serializer(serializer: &Arc<dyn TypeSerializer<String>>) -> bool {
    serializer.as_any().is::<StringSerializer>()
}

#[test]
fn test_initialize_with_serializer() {
    let descr = StateDescriptor::<String>::with_serializer("test", StringSerializer).unwrap();

    assert!(descr.is_serializer_initialized());
    assert!(is_string_serializer(&descr.serializer().unwrap()));

    // no effect on an explicit serializer
    descr
        .initialize_serializer_unless_set(&ExecutionConfig::new())
        .unwrap();
    assert!(descr.is_serializer_initialized());
    assert!(is_string_serializer(&descr.serializer().unwrap()));

    let clone = copy(&descr);
    assert!(clone.is_serializer_initialized());
    assert!(is_string_serializer(&clone.serializer().unwrap()));

    let clone_of_clone = copy(&clone);
    assert!(is_string_serializer(&clone_of_clone.serializer().unwrap()));
}

#[test]
fn test_initialize_serializer_before_serialization() {
    let descr = StateDescriptor::with_type_token("test", TypeToken::<String>::new()).unwrap();

    assert!(!descr.is_serializer_initialized());
    assert!(matches!(
        descr.serializer(),
        Err(StateError::IllegalState(_))
    ));

    descr
        .initialize_serializer_unless_set(&ExecutionConfig::new())
        .unwrap();

    assert!(descr.is_serializer_initialized());
    assert!(is_string_serializer(&descr.serializer().unwrap()));

    let clone = copy(&descr);
    assert!(clone.is_serializer_initialized());
    assert!(is_string_serializer(&clone.serializer().unwrap()));
}

#[test]
fn test_initialize_serializer_after_serialization() {
    let descr = StateDescriptor::with_type_token("test", TypeToken::<String>::new()).unwrap();

    assert!(!descr.is_serializer_initialized());
    assert!(matches!(
        descr.serializer(),
        Err(StateError::IllegalState(_))
    ));

    let clone = copy(&descr);

    assert!(!clone.is_serializer_initialized());
    assert!(matches!(
        clone.serializer(),
        Err(StateError::IllegalState(_))
    ));

    clone
        .initialize_serializer_unless_set(&ExecutionConfig::new())
        .unwrap();

    assert!(clone.is_serializer_initialized());
    assert!(is_string_serializer(&clone.serializer().unwrap()));

    // resolving the copy leaves the original alone
    assert!(!descr.is_serializer_initialized());
}

#[test]
fn test_initialize_serializer_after_serialization_with_custom_config() {
    // guard the test assumption: no registration without configuration
    let unconfigured = GenericSerializer::<String>::new(&ExecutionConfig::new());
    assert_eq!(unconfigured.registration_id_of::<FileHandle>(), None);

    let mut config = ExecutionConfig::new();
    config.register_type::<FileHandle>();

    let original =
        StateDescriptor::with_type_token("test", TypeToken::<StoragePath>::new()).unwrap();
    let clone = copy(&original);

    clone.initialize_serializer_unless_set(&config).unwrap();

    // the copy, resolved after the round-trip, carries the registration
    let serializer = clone.serializer().unwrap();
    let generic = serializer
        .as_any()
        .downcast_ref::<GenericSerializer<StoragePath>>()
        .expect("storage paths use the generic serializer");
    assert!(generic.registration_id_of::<FileHandle>().unwrap() > 0);
}

#[test]
fn test_round_trip_after_resolve_needs_no_config() {
    let mut config = ExecutionConfig::new();
    config.register_type::<FileHandle>();

    let descr =
        StateDescriptor::with_type_info("paths", TypeInformation::<StoragePath>::of()).unwrap();
    descr.initialize_serializer_unless_set(&config).unwrap();

    let clone = copy(&descr);
    assert!(clone.is_serializer_initialized());
    assert_eq!(
        clone.serializer().unwrap().snapshot(),
        descr.serializer().unwrap().snapshot()
    );

    let value = StoragePath {
        segments: vec!["var".into(), "state".into()],
    };
    let mut bytes = Vec::new();
    descr
        .serializer()
        .unwrap()
        .serialize(&value, &mut bytes)
        .unwrap();
    assert_eq!(clone.serializer().unwrap().deserialize(&bytes).unwrap(), value);
}

#[test]
fn test_resolution_keeps_first_configuration() {
    let descr = StateDescriptor::with_type_token("test", TypeToken::<StoragePath>::new()).unwrap();
    descr
        .initialize_serializer_unless_set(&ExecutionConfig::new())
        .unwrap();

    let mut later = ExecutionConfig::new();
    later.register_type::<FileHandle>();
    descr.initialize_serializer_unless_set(&later).unwrap();

    let serializer = descr.serializer().unwrap();
    let generic = serializer
        .as_any()
        .downcast_ref::<GenericSerializer<StoragePath>>()
        .unwrap();
    assert_eq!(generic.registration_id_of::<FileHandle>(), None);
}

#[test]
fn test_concurrent_resolution_binds_one_serializer() {
    let descr = StateDescriptor::with_type_token("test", TypeToken::<StoragePath>::new()).unwrap();

    let configs: Vec<ExecutionConfig> = (0..8)
        .map(|i| {
            let mut config = ExecutionConfig::new();
            config.register_type_name(format!("aux::Type{}", i));
            config
        })
        .collect();

    let observed: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = configs
            .iter()
            .map(|config| {
                let descr = &descr;
                scope.spawn(move || {
                    descr.initialize_serializer_unless_set(config).unwrap();
                    descr.serializer().unwrap().snapshot()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let bound = descr.serializer().unwrap().snapshot();
    assert!(observed.iter().all(|snapshot| *snapshot == bound));
}

#[test]
fn test_extraction_error_surfaces_from_resolution() {
    let mut config = ExecutionConfig::new();
    config.disable_generic_types();

    let descr = StateDescriptor::with_type_token("test", TypeToken::<StoragePath>::new()).unwrap();
    let clone = copy(&descr);

    let err = clone.initialize_serializer_unless_set(&config).unwrap_err();
    assert!(matches!(err, StateError::TypeExtraction(_)));
    assert!(!clone.is_serializer_initialized());
}

#[test]
fn test_equality_by_name_only() {
    let strings = StateDescriptor::<String>::with_serializer("shared", StringSerializer).unwrap();
    let paths = StateDescriptor::with_type_token("shared", TypeToken::<StoragePath>::new())
        .unwrap()
        .with_default_value(StoragePath { segments: vec![] });
    let other = StateDescriptor::<String>::with_serializer("other", StringSerializer).unwrap();

    assert!(strings == paths);
    assert!(strings != other);

    let mut set = std::collections::HashSet::new();
    assert!(set.insert(strings.clone()));
    assert!(!set.insert(copy(&strings)));
    assert!(set.insert(other));
}
