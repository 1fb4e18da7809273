// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fallback serializer for value types without a basic serializer.
//!
//! Wire layout:
//!
//! ```text
//! +----------------+-------------------------------+------------------+
//! | id: u32 LE     | [len: u32 LE][type name]      | JSON payload     |
//! |                | (only if id == UNREGISTERED)  | (rest of buffer) |
//! +----------------+-------------------------------+------------------+
//! ```

use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use super::cursor::{write_len_prefixed, Cursor};
use super::{SerializerSnapshot, TypeSerializer};
use crate::config::ExecutionConfig;
use crate::error::{Result, StateError};
use crate::typeinfo::{BasicType, StateValue};

/// First id handed out to a configured registration. Ids below are reserved
/// for the basic types.
pub const FIRST_USER_REGISTRATION_ID: u32 = 10;

/// Header id marking a value whose type carries no registration.
pub const UNREGISTERED: u32 = u32::MAX;

/// One type-name to id binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: u32,
    pub type_name: String,
}

/// Ordered registration table of a [`GenericSerializer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registrations {
    entries: Vec<Registration>,
}

impl Registrations {
    /// Table holding only the basic type registrations.
    pub fn with_defaults() -> Self {
        let entries = BasicType::ALL
            .iter()
            .map(|basic| Registration {
                id: basic.registration_id(),
                type_name: basic.type_name().to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Defaults plus every type registered in `config`, in order.
    pub fn from_config(config: &ExecutionConfig) -> Self {
        let mut registrations = Self::with_defaults();
        for name in config.registered_types() {
            registrations.register(name);
        }
        registrations
    }

    /// Register `type_name`, returning its id. Existing registrations keep their id.
    pub fn register(&mut self, type_name: &str) -> u32 {
        if let Some(id) = self.id_of(type_name) {
            return id;
        }
        let id = self
            .entries
            .iter()
            .map(|r| r.id.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(FIRST_USER_REGISTRATION_ID);
        self.entries.push(Registration {
            id,
            type_name: type_name.to_string(),
        });
        id
    }

    pub fn id_of(&self, type_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|r| r.type_name == type_name)
            .map(|r| r.id)
    }

    pub fn type_name_of(&self, id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.type_name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject tables with duplicate ids or names, or a reserved id.
    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for r in &self.entries {
            if r.id == UNREGISTERED {
                return Err(StateError::Serialization(format!(
                    "registration of {} uses the reserved id {}",
                    r.type_name, UNREGISTERED
                )));
            }
            if !ids.insert(r.id) || !names.insert(r.type_name.as_str()) {
                return Err(StateError::Serialization(format!(
                    "duplicate registration {} -> {}",
                    r.type_name, r.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Registrations {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Serializer for arbitrary serde types, framed by a registration header.
pub struct GenericSerializer<V> {
    registrations: Registrations,
    _marker: PhantomData<fn() -> V>,
}

impl<V: StateValue> GenericSerializer<V> {
    pub fn new(config: &ExecutionConfig) -> Self {
        Self::with_registrations(Registrations::from_config(config))
    }

    pub fn with_registrations(registrations: Registrations) -> Self {
        Self {
            registrations,
            _marker: PhantomData,
        }
    }

    /// Rebuild from a snapshot, checking it was taken for `V`.
    pub(crate) fn from_snapshot(snapshot_type: &str, registrations: Registrations) -> Result<Self> {
        if snapshot_type != type_name::<V>() {
            return Err(StateError::TypeMismatch {
                expected: type_name::<V>().to_string(),
                found: snapshot_type.to_string(),
            });
        }
        registrations.validate()?;
        Ok(Self::with_registrations(registrations))
    }

    pub fn registrations(&self) -> &Registrations {
        &self.registrations
    }

    /// Registration id of `type_name`, `None` if the type is not registered.
    pub fn registration_id(&self, type_name: &str) -> Option<u32> {
        self.registrations.id_of(type_name)
    }

    pub fn registration_id_of<T: ?Sized + 'static>(&self) -> Option<u32> {
        self.registration_id(type_name::<T>())
    }
}

impl<V: StateValue> TypeSerializer<V> for GenericSerializer<V> {
    fn serialize(&self, value: &V, out: &mut Vec<u8>) -> Result<()> {
        let name = type_name::<V>();
        match self.registrations.id_of(name) {
            Some(id) => out.extend_from_slice(&id.to_le_bytes()),
            None => {
                out.extend_from_slice(&UNREGISTERED.to_le_bytes());
                write_len_prefixed(out, name.as_bytes())?;
            }
        }
        serde_json::to_writer(&mut *out, value)
            .map_err(|e| StateError::Serialization(format!("encode {}: {}", name, e)))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        let expected = type_name::<V>();
        let mut cursor = Cursor::new(bytes);
        let id = cursor.read_u32_le()?;
        let found = if id == UNREGISTERED {
            let raw = cursor.read_len_prefixed()?;
            std::str::from_utf8(raw)
                .map_err(|e| StateError::Serialization(format!("invalid type name: {}", e)))?
        } else {
            self.registrations.type_name_of(id).ok_or_else(|| {
                StateError::Serialization(format!("unknown registration id {}", id))
            })?
        };
        if found != expected {
            return Err(StateError::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        serde_json::from_slice(cursor.read_rest())
            .map_err(|e| StateError::Serialization(format!("decode {}: {}", expected, e)))
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Generic {
            type_name: type_name::<V>().to_string(),
            registrations: self.registrations.clone(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<V> Clone for GenericSerializer<V> {
    fn clone(&self) -> Self {
        Self {
            registrations: self.registrations.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V> fmt::Debug for GenericSerializer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericSerializer")
            .field("type_name", &type_name::<V>())
            .field("registrations", &self.registrations.len())
            .finish()
    }
}
