// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # State Descriptor
//!
//! A [`StateDescriptor`] names a piece of managed state and says how its values
//! are serialized.
//!
//! ## Serializer lifecycle
//!
//! ```text
//! with_serializer(name, S) ----------------------------> Resolved(S)
//! with_type_info(name, info) --+
//!                              +--> Unresolved --initialize_serializer_unless_set(config)--> Resolved
//! with_type_token(name, tok) --+
//! ```
//!
//! - `Resolved` is terminal: later resolutions, whatever their configuration,
//!   leave the bound serializer untouched.
//! - Persisting an `Unresolved` descriptor writes no serializer; the restored
//!   copy resolves on its own, with the configuration of the context that
//!   restores it.
//! - Persisting a `Resolved` descriptor writes the serializer's
//!   [`SerializerSnapshot`]; the restored copy is resolved without any
//!   configuration.
//!
//! ## Example
//!
//! ```rust
//! use keyed_state::{ExecutionConfig, StateDescriptor, TypeSerializer, TypeToken};
//!
//! let descriptor = StateDescriptor::with_type_token("clicks", TypeToken::<i64>::new())?
//!     .with_default_value(0);
//! assert!(!descriptor.is_serializer_initialized());
//!
//! descriptor.initialize_serializer_unless_set(&ExecutionConfig::new())?;
//! let mut bytes = Vec::new();
//! descriptor.serializer()?.serialize(&42, &mut bytes)?;
//! # Ok::<(), keyed_state::StateError>(())
//! ```

use parking_lot::RwLock;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::ExecutionConfig;
use crate::error::{Result, StateError};
use crate::serializer::{SerializerSnapshot, TypeSerializer};
use crate::typeinfo::{StateValue, TypeExtractor, TypeInformation, TypeToken};

/// Kind of state a descriptor describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    #[default]
    Unknown,
    Value,
    List,
    Reducing,
    Aggregating,
    Map,
}

/// Where the serializer comes from. Fixed at construction.
#[derive(Serialize, Deserialize)]
#[serde(
    tag = "source",
    rename_all = "snake_case",
    bound(serialize = "", deserialize = "V: 'static")
)]
enum SerializerSource<V> {
    /// Supplied directly; the slot is resolved from the start.
    Explicit,
    TypeInfo { info: TypeInformation<V> },
    Token { token: TypeToken<V> },
}

impl<V> Clone for SerializerSource<V> {
    fn clone(&self) -> Self {
        match self {
            SerializerSource::Explicit => SerializerSource::Explicit,
            SerializerSource::TypeInfo { info } => {
                SerializerSource::TypeInfo { info: info.clone() }
            }
            SerializerSource::Token { token } => SerializerSource::Token { token: *token },
        }
    }
}

impl<V> fmt::Debug for SerializerSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerSource::Explicit => f.write_str("Explicit"),
            SerializerSource::TypeInfo { info } => write!(f, "TypeInfo({:?})", info),
            SerializerSource::Token { .. } => {
                write!(f, "Token({})", std::any::type_name::<V>())
            }
        }
    }
}

/// Serializer slot. Moves from `Unresolved` to `Resolved` at most once.
enum SerializerState<V> {
    Unresolved,
    Resolved(Arc<dyn TypeSerializer<V>>),
}

impl<V> SerializerState<V> {
    fn get(&self) -> Option<&Arc<dyn TypeSerializer<V>>> {
        match self {
            SerializerState::Unresolved => None,
            SerializerState::Resolved(serializer) => Some(serializer),
        }
    }
}

impl<V> Clone for SerializerState<V> {
    fn clone(&self) -> Self {
        match self {
            SerializerState::Unresolved => SerializerState::Unresolved,
            SerializerState::Resolved(serializer) => {
                SerializerState::Resolved(Arc::clone(serializer))
            }
        }
    }
}

/// A named, typed handle to a piece of managed state.
///
/// # Equality
///
/// **Descriptors are identified by name alone.** `PartialEq`, `Eq` and `Hash`
/// look at nothing but [`name`](Self::name): two descriptors with the same name
/// compare equal even if their value types, serializer sources, kinds, default
/// values or resolution states differ. Lookups of registered state are keyed
/// by logical name, and they depend on this; do not widen the comparison.
///
/// ```rust
/// use keyed_state::{StateDescriptor, TypeToken};
///
/// let counts = StateDescriptor::with_type_token("metric", TypeToken::<i64>::new())?;
/// let labels = StateDescriptor::with_type_token("metric", TypeToken::<String>::new())?;
/// assert!(counts == labels);
/// # Ok::<(), keyed_state::StateError>(())
/// ```
pub struct StateDescriptor<V> {
    name: String,
    kind: StateKind,
    default_value: Option<V>,
    queryable_name: Option<String>,
    source: SerializerSource<V>,
    serializer: RwLock<SerializerState<V>>,
}

fn validated_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(StateError::InvalidArgument(
            "state name must not be empty".into(),
        ));
    }
    Ok(name)
}

impl<V: StateValue> StateDescriptor<V> {
    /// Descriptor bound to `serializer` right away.
    pub fn with_serializer<S>(name: impl Into<String>, serializer: S) -> Result<Self>
    where
        S: TypeSerializer<V> + 'static,
    {
        Self::with_shared_serializer(name, Arc::new(serializer))
    }

    pub fn with_shared_serializer(
        name: impl Into<String>,
        serializer: Arc<dyn TypeSerializer<V>>,
    ) -> Result<Self> {
        Self::build(
            name,
            SerializerSource::Explicit,
            SerializerState::Resolved(serializer),
        )
    }

    /// Descriptor whose serializer is created from `info` on resolution.
    pub fn with_type_info(name: impl Into<String>, info: TypeInformation<V>) -> Result<Self> {
        Self::build(
            name,
            SerializerSource::TypeInfo { info },
            SerializerState::Unresolved,
        )
    }

    /// Descriptor whose type information is extracted from `token` on resolution.
    pub fn with_type_token(name: impl Into<String>, token: TypeToken<V>) -> Result<Self> {
        Self::build(
            name,
            SerializerSource::Token { token },
            SerializerState::Unresolved,
        )
    }

    fn build(
        name: impl Into<String>,
        source: SerializerSource<V>,
        state: SerializerState<V>,
    ) -> Result<Self> {
        Ok(Self {
            name: validated_name(name)?,
            kind: StateKind::default(),
            default_value: None,
            queryable_name: None,
            source,
            serializer: RwLock::new(state),
        })
    }

    #[must_use]
    pub fn with_default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Resolve the serializer with `config`, unless it is already resolved.
    ///
    /// A resolved descriptor ignores the call, so the first successful
    /// resolution fixes the serializer for good. If two callers race, both
    /// build a serializer, the first to store it wins and the other's is
    /// dropped.
    ///
    /// # Errors
    ///
    /// - `TypeExtraction` when a token-sourced descriptor cannot derive type
    ///   information under `config`.
    /// - `Unsupported` when `config` forbids the serializer the type needs.
    pub fn initialize_serializer_unless_set(&self, config: &ExecutionConfig) -> Result<()> {
        if self.is_serializer_initialized() {
            return Ok(());
        }

        let serializer = match &self.source {
            SerializerSource::Explicit => {
                return Err(StateError::IllegalState(format!(
                    "state '{}' was built with an explicit serializer but has none",
                    self.name
                )))
            }
            SerializerSource::TypeInfo { info } => info.create_serializer(config)?,
            SerializerSource::Token { token } => {
                TypeExtractor::extract(token, config)?.create_serializer(config)?
            }
        };

        let mut slot = self.serializer.write();
        match &*slot {
            SerializerState::Resolved(_) => {
                log::trace!(
                    "[StateDescriptor] '{}' already resolved, discarding {:?}",
                    self.name,
                    serializer
                );
            }
            SerializerState::Unresolved => {
                log::debug!(
                    "[StateDescriptor] '{}' resolved serializer {:?}",
                    self.name,
                    serializer
                );
                *slot = SerializerState::Resolved(serializer);
            }
        }
        Ok(())
    }

    /// Make the state queryable under `queryable_name`. Can only be set once.
    pub fn set_queryable(&mut self, queryable_name: impl Into<String>) -> Result<()> {
        let queryable_name = queryable_name.into();
        if queryable_name.trim().is_empty() {
            return Err(StateError::InvalidArgument(
                "queryable state name must not be empty".into(),
            ));
        }
        if let Some(existing) = &self.queryable_name {
            return Err(StateError::IllegalState(format!(
                "queryable state name already set to '{}'",
                existing
            )));
        }
        self.queryable_name = Some(queryable_name);
        Ok(())
    }
}

impl<V> StateDescriptor<V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    pub fn queryable_state_name(&self) -> Option<&str> {
        self.queryable_name.as_deref()
    }

    pub fn is_queryable(&self) -> bool {
        self.queryable_name.is_some()
    }

    pub fn is_serializer_initialized(&self) -> bool {
        self.serializer.read().get().is_some()
    }

    /// The resolved serializer.
    ///
    /// Never resolves on its own: fails with `IllegalState` until
    /// [`initialize_serializer_unless_set`](Self::initialize_serializer_unless_set)
    /// has succeeded (or the descriptor was built with a serializer).
    pub fn serializer(&self) -> Result<Arc<dyn TypeSerializer<V>>> {
        self.serializer.read().get().cloned().ok_or_else(|| {
            StateError::IllegalState(format!(
                "serializer of state '{}' not yet initialized; \
                 call initialize_serializer_unless_set first",
                self.name
            ))
        })
    }
}

impl<V, W> PartialEq<StateDescriptor<W>> for StateDescriptor<V> {
    fn eq(&self, other: &StateDescriptor<W>) -> bool {
        self.name == other.name
    }
}

impl<V> Eq for StateDescriptor<V> {}

impl<V> Hash for StateDescriptor<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<V: Clone> Clone for StateDescriptor<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            default_value: self.default_value.clone(),
            queryable_name: self.queryable_name.clone(),
            source: self.source.clone(),
            serializer: RwLock::new(self.serializer.read().clone()),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for StateDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.serializer.read();
        f.debug_struct("StateDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default_value", &self.default_value)
            .field("queryable_name", &self.queryable_name)
            .field("source", &self.source)
            .field("serializer", &slot.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(bound(serialize = "V: Serialize"))]
struct PersistedRef<'a, V> {
    name: &'a str,
    kind: StateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    queryable_name: Option<&'a str>,
    default_value: Option<&'a V>,
    #[serde(flatten)]
    source: &'a SerializerSource<V>,
    /// Absent while unresolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    serializer: Option<SerializerSnapshot>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "V: StateValue"))]
struct Persisted<V> {
    name: String,
    #[serde(default)]
    kind: StateKind,
    #[serde(default)]
    queryable_name: Option<String>,
    #[serde(default)]
    default_value: Option<V>,
    #[serde(flatten)]
    source: SerializerSource<V>,
    #[serde(default)]
    serializer: Option<SerializerSnapshot>,
}

impl<V: StateValue> StateDescriptor<V> {
    fn from_persisted(persisted: Persisted<V>) -> Result<Self> {
        let state = match (&persisted.source, persisted.serializer) {
            (_, Some(snapshot)) => SerializerState::Resolved(snapshot.restore::<V>()?),
            (SerializerSource::Explicit, None) => {
                return Err(StateError::IllegalState(format!(
                    "persisted state '{}' has an explicit serializer source but no serializer",
                    persisted.name
                )))
            }
            (_, None) => SerializerState::Unresolved,
        };

        let mut descriptor = Self::build(persisted.name, persisted.source, state)?;
        descriptor.kind = persisted.kind;
        descriptor.default_value = persisted.default_value;
        if let Some(queryable_name) = persisted.queryable_name {
            descriptor.set_queryable(queryable_name)?;
        }
        Ok(descriptor)
    }
}

impl<V: Serialize> Serialize for StateDescriptor<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let snapshot = self.serializer.read().get().map(|s| s.snapshot());
        PersistedRef {
            name: &self.name,
            kind: self.kind,
            queryable_name: self.queryable_name.as_deref(),
            default_value: self.default_value.as_ref(),
            source: &self.source,
            serializer: snapshot,
        }
        .serialize(serializer)
    }
}

impl<'de, V: StateValue> Deserialize<'de> for StateDescriptor<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let persisted = Persisted::<V>::deserialize(deserializer)?;
        Self::from_persisted(persisted).map_err(D::Error::custom)
    }
}
