// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked helpers for serializer wire layouts (little-endian).

use crate::error::{Result, StateError};

/// Append `data` with a u32 LE length prefix.
pub(crate) fn write_len_prefixed(out: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len()).map_err(|_| {
        StateError::Serialization(format!(
            "length {} exceeds u32 length prefix",
            data.len()
        ))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(data);
    Ok(())
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub(crate) struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.read_bytes(N)?);
        Ok(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(StateError::Serialization(format!(
                "read failed at offset {}: unexpected end of buffer",
                self.offset
            )));
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub(crate) fn read_len_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)
    }

    /// Consume everything left in the buffer.
    pub(crate) fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.buffer[self.offset..];
        self.offset = self.buffer.len();
        rest
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    /// Fail if any bytes are left unread.
    pub(crate) fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(StateError::Serialization(format!(
                "{} trailing bytes after offset {}",
                self.remaining(),
                self.offset
            )));
        }
        Ok(())
    }
}
