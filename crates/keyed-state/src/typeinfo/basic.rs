// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Types with a dedicated fixed-layout serializer.

use serde::{Deserialize, Serialize};
use std::any::{type_name, TypeId};

/// Value types served by a basic serializer instead of the generic one.
///
/// The discriminant doubles as the type's default registration id in
/// [`Registrations`](crate::serializer::Registrations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicType {
    Bool = 0,
    I32 = 1,
    I64 = 2,
    U32 = 3,
    U64 = 4,
    F32 = 5,
    F64 = 6,
    String = 7,
    Bytes = 8,
}

impl BasicType {
    /// All basic types, in registration id order.
    pub const ALL: [BasicType; 9] = [
        BasicType::Bool,
        BasicType::I32,
        BasicType::I64,
        BasicType::U32,
        BasicType::U64,
        BasicType::F32,
        BasicType::F64,
        BasicType::String,
        BasicType::Bytes,
    ];

    /// Basic type of `V`, or `None` if `V` needs the generic serializer.
    pub fn of<V: ?Sized + 'static>() -> Option<Self> {
        let id = TypeId::of::<V>();
        Self::ALL.into_iter().find(|basic| basic.type_id() == id)
    }

    pub fn type_id(self) -> TypeId {
        match self {
            BasicType::Bool => TypeId::of::<bool>(),
            BasicType::I32 => TypeId::of::<i32>(),
            BasicType::I64 => TypeId::of::<i64>(),
            BasicType::U32 => TypeId::of::<u32>(),
            BasicType::U64 => TypeId::of::<u64>(),
            BasicType::F32 => TypeId::of::<f32>(),
            BasicType::F64 => TypeId::of::<f64>(),
            BasicType::String => TypeId::of::<String>(),
            BasicType::Bytes => TypeId::of::<Vec<u8>>(),
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            BasicType::Bool => type_name::<bool>(),
            BasicType::I32 => type_name::<i32>(),
            BasicType::I64 => type_name::<i64>(),
            BasicType::U32 => type_name::<u32>(),
            BasicType::U64 => type_name::<u64>(),
            BasicType::F32 => type_name::<f32>(),
            BasicType::F64 => type_name::<f64>(),
            BasicType::String => type_name::<String>(),
            BasicType::Bytes => type_name::<Vec<u8>>(),
        }
    }

    pub(crate) fn registration_id(self) -> u32 {
        self as u32
    }
}
