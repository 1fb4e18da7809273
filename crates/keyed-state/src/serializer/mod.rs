// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value serializers bound to state descriptors.
//!
//! Two families:
//!
//! - **Basic serializers** for [`BasicType`](crate::typeinfo::BasicType) values,
//!   fixed little-endian layouts with u32 length prefixes for strings and bytes.
//! - [`GenericSerializer`] for everything else: a registration header followed by
//!   a JSON payload. Types registered through
//!   [`ExecutionConfig`](crate::ExecutionConfig) get compact numeric ids.
//!
//! Every serializer can describe itself as a [`SerializerSnapshot`], which is
//! what a resolved descriptor persists and restores.

pub(crate) mod basic;
mod cursor;
mod generic;
mod snapshot;

pub use basic::{
    BoolSerializer, BytesSerializer, DoubleSerializer, FloatSerializer, IntSerializer,
    LongSerializer, StringSerializer, UIntSerializer, ULongSerializer,
};
pub use generic::{
    GenericSerializer, Registration, Registrations, FIRST_USER_REGISTRATION_ID, UNREGISTERED,
};
pub use snapshot::SerializerSnapshot;

use std::any::Any;
use std::fmt;

use crate::error::Result;

/// Encodes and decodes values of type `V`.
pub trait TypeSerializer<V>: fmt::Debug + Send + Sync {
    /// Append the encoding of `value` to `out`.
    fn serialize(&self, value: &V, out: &mut Vec<u8>) -> Result<()>;

    /// Decode a value from exactly `bytes`.
    fn deserialize(&self, bytes: &[u8]) -> Result<V>;

    /// Transportable description this serializer can be rebuilt from.
    fn snapshot(&self) -> SerializerSnapshot;

    /// Concrete serializer, for callers that need implementation details.
    fn as_any(&self) -> &dyn Any;
}
