// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::error::StateError;

/// Zero-sized witness for a value type, used when no type information is at hand.
///
/// Persisted as the type's fully-qualified name. Names come from
/// [`std::any::type_name`], so a token only restores inside a build that
/// produces the same name for `V`.
pub struct TypeToken<V: ?Sized> {
    _marker: PhantomData<fn() -> V>,
}

impl<V: ?Sized + 'static> TypeToken<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    pub fn type_name(&self) -> &'static str {
        type_name::<V>()
    }

    pub fn type_id(&self) -> TypeId {
        TypeId::of::<V>()
    }

    /// Rebuild a token from a persisted type name.
    pub fn from_type_name(name: &str) -> Result<Self, StateError> {
        if name != type_name::<V>() {
            return Err(StateError::TypeMismatch {
                expected: type_name::<V>().to_string(),
                found: name.to_string(),
            });
        }
        Ok(Self::new())
    }
}

impl<V: ?Sized + 'static> Default for TypeToken<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> Clone for TypeToken<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for TypeToken<V> {}

impl<V: ?Sized> fmt::Debug for TypeToken<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken<{}>", type_name::<V>())
    }
}

impl<V: ?Sized> Serialize for TypeToken<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(type_name::<V>())
    }
}

impl<'de, V: ?Sized + 'static> Deserialize<'de> for TypeToken<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_type_name(&name).map_err(D::Error::custom)
    }
}
