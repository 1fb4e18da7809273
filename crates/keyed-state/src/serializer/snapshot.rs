// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{basic, GenericSerializer, Registrations, TypeSerializer};
use crate::error::Result;
use crate::typeinfo::{BasicType, StateValue};

/// Transportable description of a resolved serializer.
///
/// This is what crosses a persistence boundary in place of the serializer
/// itself. [`restore`](Self::restore) rebuilds an equivalent serializer without
/// consulting any configuration: registration hints are frozen into the
/// snapshot at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SerializerSnapshot {
    Basic {
        ty: BasicType,
    },
    Generic {
        type_name: String,
        registrations: Registrations,
    },
}

impl SerializerSnapshot {
    /// Rebuild the serializer, failing with `TypeMismatch` if it was not taken for `V`.
    pub fn restore<V: StateValue>(&self) -> Result<Arc<dyn TypeSerializer<V>>> {
        match self {
            SerializerSnapshot::Basic { ty } => basic::serializer_for::<V>(*ty),
            SerializerSnapshot::Generic {
                type_name,
                registrations,
            } => Ok(Arc::new(GenericSerializer::<V>::from_snapshot(
                type_name,
                registrations.clone(),
            )?)),
        }
    }

    /// Name of the value type the serializer was built for.
    pub fn type_name(&self) -> &str {
        match self {
            SerializerSnapshot::Basic { ty } => ty.type_name(),
            SerializerSnapshot::Generic { type_name, .. } => type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionConfig;
    use crate::error::StateError;
    use crate::serializer::{LongSerializer, FIRST_USER_REGISTRATION_ID};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Track {
        id: u64,
        title: String,
    }

    #[allow(dead_code)]
    struct Album;

    #[test]
    fn basic_snapshot_restores_same_serializer() {
        let snapshot = LongSerializer.snapshot();
        let restored = snapshot.restore::<i64>().unwrap();
        assert!(restored.as_any().is::<LongSerializer>());
        assert_eq!(snapshot.type_name(), "i64");
    }

    #[test]
    fn generic_snapshot_keeps_registrations() {
        let mut config = ExecutionConfig::new();
        config.register_type::<Album>();
        let original = GenericSerializer::<Track>::new(&config);

        let json = serde_json::to_string(&original.snapshot()).unwrap();
        let snapshot: SerializerSnapshot = serde_json::from_str(&json).unwrap();
        let restored = snapshot.restore::<Track>().unwrap();

        let generic = restored
            .as_any()
            .downcast_ref::<GenericSerializer<Track>>()
            .unwrap();
        assert_eq!(
            generic.registration_id_of::<Album>(),
            Some(FIRST_USER_REGISTRATION_ID)
        );
        assert_eq!(generic.registrations(), original.registrations());
    }

    #[test]
    fn restore_into_other_type_fails() {
        let snapshot = GenericSerializer::<Track>::new(&ExecutionConfig::new()).snapshot();
        let err = snapshot.restore::<Vec<String>>().unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { .. }));

        let err = LongSerializer.snapshot().restore::<String>().unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { .. }));
    }
}
