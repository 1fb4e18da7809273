// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::any::{type_name, Any};
use std::sync::Arc;

use super::cursor::{write_len_prefixed, Cursor};
use super::{SerializerSnapshot, TypeSerializer};
use crate::error::{Result, StateError};
use crate::typeinfo::BasicType;

/// Generate a stateless serializer for a fixed-width numeric type
///
/// The encoding is the value's `to_le_bytes()`; decoding rejects short and
/// over-long buffers.
macro_rules! fixed_width_serializer {
    ($(#[$meta:meta])* $name:ident, $type:ty, $basic:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl $name {
            pub const INSTANCE: Self = Self;
        }

        impl TypeSerializer<$type> for $name {
            fn serialize(&self, value: &$type, out: &mut Vec<u8>) -> Result<()> {
                out.extend_from_slice(&value.to_le_bytes());
                Ok(())
            }

            fn deserialize(&self, bytes: &[u8]) -> Result<$type> {
                let mut cursor = Cursor::new(bytes);
                let value = <$type>::from_le_bytes(cursor.read_array()?);
                cursor.finish()?;
                Ok(value)
            }

            fn snapshot(&self) -> SerializerSnapshot {
                SerializerSnapshot::Basic {
                    ty: BasicType::$basic,
                }
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

fixed_width_serializer!(
    /// `i32`, 4 bytes LE.
    IntSerializer, i32, I32
);
fixed_width_serializer!(
    /// `i64`, 8 bytes LE.
    LongSerializer, i64, I64
);
fixed_width_serializer!(UIntSerializer, u32, U32);
fixed_width_serializer!(ULongSerializer, u64, U64);
fixed_width_serializer!(
    /// `f32`, IEEE-754 bits, 4 bytes LE.
    FloatSerializer, f32, F32
);
fixed_width_serializer!(
    /// `f64`, IEEE-754 bits, 8 bytes LE.
    DoubleSerializer, f64, F64
);

/// `bool` as a single `0`/`1` byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolSerializer;

impl BoolSerializer {
    pub const INSTANCE: Self = Self;
}

impl TypeSerializer<bool> for BoolSerializer {
    fn serialize(&self, value: &bool, out: &mut Vec<u8>) -> Result<()> {
        out.push(u8::from(*value));
        Ok(())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<bool> {
        let mut cursor = Cursor::new(bytes);
        let value = match cursor.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(StateError::Serialization(format!(
                    "invalid bool byte 0x{:02x}",
                    other
                )))
            }
        };
        cursor.finish()?;
        Ok(value)
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Basic {
            ty: BasicType::Bool,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// UTF-8 `String` with a u32 LE byte-length prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringSerializer;

impl StringSerializer {
    pub const INSTANCE: Self = Self;
}

impl TypeSerializer<String> for StringSerializer {
    fn serialize(&self, value: &String, out: &mut Vec<u8>) -> Result<()> {
        write_len_prefixed(out, value.as_bytes())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<String> {
        let mut cursor = Cursor::new(bytes);
        let raw = cursor.read_len_prefixed()?;
        cursor.finish()?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| StateError::Serialization(format!("invalid UTF-8 string: {}", e)))
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Basic {
            ty: BasicType::String,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Raw `Vec<u8>` with a u32 LE length prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytesSerializer;

impl BytesSerializer {
    pub const INSTANCE: Self = Self;
}

impl TypeSerializer<Vec<u8>> for BytesSerializer {
    fn serialize(&self, value: &Vec<u8>, out: &mut Vec<u8>) -> Result<()> {
        write_len_prefixed(out, value)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(bytes);
        let raw = cursor.read_len_prefixed()?;
        cursor.finish()?;
        Ok(raw.to_vec())
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Basic {
            ty: BasicType::Bytes,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn erase<T, S>(serializer: S) -> Box<dyn Any>
where
    T: 'static,
    S: TypeSerializer<T> + 'static,
{
    Box::new(Arc::new(serializer) as Arc<dyn TypeSerializer<T>>)
}

/// Basic serializer for `ty`, typed as a serializer of `V`.
///
/// Fails with `TypeMismatch` when `ty` does not describe `V`.
pub(crate) fn serializer_for<V: 'static>(ty: BasicType) -> Result<Arc<dyn TypeSerializer<V>>> {
    let erased = match ty {
        BasicType::Bool => erase::<bool, _>(BoolSerializer),
        BasicType::I32 => erase::<i32, _>(IntSerializer),
        BasicType::I64 => erase::<i64, _>(LongSerializer),
        BasicType::U32 => erase::<u32, _>(UIntSerializer),
        BasicType::U64 => erase::<u64, _>(ULongSerializer),
        BasicType::F32 => erase::<f32, _>(FloatSerializer),
        BasicType::F64 => erase::<f64, _>(DoubleSerializer),
        BasicType::String => erase::<String, _>(StringSerializer),
        BasicType::Bytes => erase::<Vec<u8>, _>(BytesSerializer),
    };
    erased
        .downcast::<Arc<dyn TypeSerializer<V>>>()
        .map(|serializer| *serializer)
        .map_err(|_| StateError::TypeMismatch {
            expected: type_name::<V>().to_string(),
            found: ty.type_name().to_string(),
        })
}
