// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unwrap_used)] // Tests panic on failure

//! Resolution driven by an execution configuration loaded from TOML.

use keyed_state::serializer::{GenericSerializer, FIRST_USER_REGISTRATION_ID};
use keyed_state::{
    ConfigError, ExecutionConfig, SerializerSnapshot, StateDescriptor, StateError, StateKind,
    TypeInformation, TypeToken,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    hits: u64,
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_registrations_from_file_reach_serializer() {
    let file = write_config(
        r#"
registered_types = ["shop::Cart", "shop::LineItem"]
"#,
    );
    let config = ExecutionConfig::from_file(file.path()).unwrap();

    let descr = StateDescriptor::with_type_token("counters", TypeToken::<Counter>::new())
        .unwrap()
        .with_kind(StateKind::Value);
    descr.initialize_serializer_unless_set(&config).unwrap();

    let serializer = descr.serializer().unwrap();
    let generic = serializer
        .as_any()
        .downcast_ref::<GenericSerializer<Counter>>()
        .unwrap();
    assert_eq!(
        generic.registration_id("shop::Cart"),
        Some(FIRST_USER_REGISTRATION_ID)
    );
    assert_eq!(
        generic.registration_id("shop::LineItem"),
        Some(FIRST_USER_REGISTRATION_ID + 1)
    );
}

#[test]
fn test_force_generic_from_file() {
    let file = write_config("force_generic = true\n");
    let config = ExecutionConfig::from_file(file.path()).unwrap();

    let descr = StateDescriptor::with_type_info("totals", TypeInformation::<u64>::of()).unwrap();
    descr.initialize_serializer_unless_set(&config).unwrap();

    assert!(matches!(
        descr.serializer().unwrap().snapshot(),
        SerializerSnapshot::Generic { .. }
    ));
}

#[test]
fn test_generic_types_disabled_from_file() {
    let file = write_config("disable_generic_types = true\n");
    let config = ExecutionConfig::from_file(file.path()).unwrap();

    // basic types still resolve
    let totals = StateDescriptor::with_type_token("totals", TypeToken::<u64>::new()).unwrap();
    totals.initialize_serializer_unless_set(&config).unwrap();
    assert!(totals.is_serializer_initialized());

    let counters =
        StateDescriptor::with_type_token("counters", TypeToken::<Counter>::new()).unwrap();
    let err = counters.initialize_serializer_unless_set(&config).unwrap_err();
    assert!(matches!(err, StateError::TypeExtraction(_)));

    let from_info =
        StateDescriptor::with_type_info("counters", TypeInformation::<Counter>::of()).unwrap();
    let err = from_info.initialize_serializer_unless_set(&config).unwrap_err();
    assert!(matches!(err, StateError::Unsupported(_)));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let file = write_config("registered_types = [\"  \"]\n");
    let err = ExecutionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let file = write_config("registered_types = 42\n");
    let err = ExecutionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}
