// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{BasicType, StateValue};
use crate::config::ExecutionConfig;
use crate::error::{Result, StateError};
use crate::serializer::{basic, GenericSerializer, TypeSerializer};

/// Persisted shape of a [`TypeInformation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Served by the fixed-layout serializer for `ty`.
    Basic { ty: BasicType },
    /// Served by [`GenericSerializer`].
    Generic { type_name: String },
}

/// Metadata describing `V` well enough to construct a serializer for it.
pub struct TypeInformation<V> {
    kind: TypeKind,
    _marker: PhantomData<fn() -> V>,
}

impl<V: 'static> TypeInformation<V> {
    /// Basic type information when `V` has one, generic otherwise.
    pub fn of() -> Self {
        Self::basic().unwrap_or_else(Self::generic)
    }

    pub fn basic() -> Option<Self> {
        BasicType::of::<V>().map(|ty| Self {
            kind: TypeKind::Basic { ty },
            _marker: PhantomData,
        })
    }

    /// Generic type information, even when a basic serializer would exist.
    pub fn generic() -> Self {
        Self {
            kind: TypeKind::Generic {
                type_name: type_name::<V>().to_string(),
            },
            _marker: PhantomData,
        }
    }

    /// Rebuild type information from its persisted shape, checking it describes `V`.
    pub fn from_kind(kind: TypeKind) -> Result<Self> {
        let found = match &kind {
            TypeKind::Basic { ty } if BasicType::of::<V>() == Some(*ty) => None,
            TypeKind::Basic { ty } => Some(ty.type_name().to_string()),
            TypeKind::Generic { type_name: name } if name == type_name::<V>() => None,
            TypeKind::Generic { type_name: name } => Some(name.clone()),
        };
        if let Some(found) = found {
            return Err(StateError::TypeMismatch {
                expected: type_name::<V>().to_string(),
                found,
            });
        }
        Ok(Self {
            kind,
            _marker: PhantomData,
        })
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_basic_type(&self) -> bool {
        matches!(self.kind, TypeKind::Basic { .. })
    }

    pub fn type_name(&self) -> &str {
        match &self.kind {
            TypeKind::Basic { ty } => ty.type_name(),
            TypeKind::Generic { type_name } => type_name,
        }
    }
}

impl<V: StateValue> TypeInformation<V> {
    /// Build a serializer for `V`, honouring the configuration's hints.
    pub fn create_serializer(
        &self,
        config: &ExecutionConfig,
    ) -> Result<Arc<dyn TypeSerializer<V>>> {
        if let TypeKind::Basic { ty } = self.kind {
            if !config.is_force_generic_enabled() {
                return basic::serializer_for::<V>(ty);
            }
        }
        if config.has_generic_types_disabled() {
            return Err(StateError::Unsupported(format!(
                "generic serializer requested for {}, but generic types are disabled",
                self.type_name()
            )));
        }
        Ok(Arc::new(GenericSerializer::<V>::new(config)))
    }
}

impl<V> Clone for TypeInformation<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V> PartialEq for TypeInformation<V> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl<V> fmt::Debug for TypeInformation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInformation")
            .field("kind", &self.kind)
            .finish()
    }
}

impl<V> Serialize for TypeInformation<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.kind.serialize(serializer)
    }
}

impl<'de, V: 'static> Deserialize<'de> for TypeInformation<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let kind = TypeKind::deserialize(deserializer)?;
        Self::from_kind(kind).map_err(D::Error::custom)
    }
}
