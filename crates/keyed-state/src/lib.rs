// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # keyed-state - named, typed state descriptors
//!
//! A [`StateDescriptor`] binds a logical state name to the serializer of the
//! state's values. The serializer may be supplied up front, or resolved later,
//! exactly once, from type information and an [`ExecutionConfig`] carrying
//! registration hints. Descriptors survive a serde round-trip with their
//! resolution state intact: an unresolved descriptor stays unresolved (and
//! resolves later with the restoring side's configuration), a resolved one
//! carries its serializer along.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_state::{ExecutionConfig, StateDescriptor, StateKind, TypeToken};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Session { user: String, pages: u32 }
//!
//! let descriptor = StateDescriptor::with_type_token("sessions", TypeToken::<Session>::new())?
//!     .with_kind(StateKind::Value);
//!
//! // Ship the descriptor before resolving it...
//! let wire = serde_json::to_string(&descriptor).unwrap();
//! let remote: StateDescriptor<Session> = serde_json::from_str(&wire).unwrap();
//! assert!(!remote.is_serializer_initialized());
//!
//! // ...and resolve it with the remote side's configuration.
//! let mut config = ExecutionConfig::new();
//! config.register_type::<Session>();
//! remote.initialize_serializer_unless_set(&config)?;
//! assert!(remote.is_serializer_initialized());
//! # Ok::<(), keyed_state::StateError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! StateDescriptor<V>
//!   |-- name (identity: equality and hashing)
//!   |-- SerializerSource: Explicit | TypeInfo | Token
//!   +-- serializer slot:  Unresolved | Resolved(Arc<dyn TypeSerializer<V>>)
//!                                          |
//!   TypeToken --TypeExtractor--> TypeInformation --create_serializer(config)--+
//! ```
//!
//! ## Modules Overview
//!
//! - [`descriptor`] - the descriptor and its lifecycle (start here)
//! - [`typeinfo`] - type tokens, type information, extraction
//! - [`serializer`] - basic and generic serializers, snapshots
//! - [`config`] - execution configuration
//! - [`error`] - error types

/// Execution configuration (registration hints, TOML loading).
pub mod config;
/// State descriptors and their serializer lifecycle.
pub mod descriptor;
/// Error types.
pub mod error;
/// Value serializers and their transportable snapshots.
pub mod serializer;
/// Type tokens, type information and extraction.
pub mod typeinfo;

pub use config::{ConfigError, ExecutionConfig};
pub use descriptor::{StateDescriptor, StateKind};
pub use error::{Result, StateError, TypeExtractionError};
pub use serializer::{GenericSerializer, SerializerSnapshot, TypeSerializer};
pub use typeinfo::{BasicType, StateValue, TypeExtractor, TypeInformation, TypeKind, TypeToken};
