// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The call convention shared with compiled modules.
//!
//! A compiled module exports `memory`, `alloc(len: i32) -> i32`, and one
//! function per entry point with signature
//! `(in_ptr: i32, in_len: i32) -> (out_ptr: i32, out_len: i32)`.
//!
//! Tensor payloads are length-prefixed and little-endian:
//!
//! ```text
//! payload := u32 tensor_count, tensor*
//! tensor  := u32 rank, u32 dims[rank], u32 kind, u32 bits, element bytes
//! ```
//!
//! `kind` is one of the `KIND_*` codes below; elements are stored at their
//! native width, so no precision is lost crossing the boundary. A
//! zero-length output region decodes as an empty result sequence.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::tensor::{ElementType, TensorData, TensorValue};

pub const KIND_SIGNED_INT: u32 = 0;
pub const KIND_UNSIGNED_INT: u32 = 1;
pub const KIND_FLOAT: u32 = 2;
pub const KIND_BOOL: u32 = 3;

fn kind_and_bits(element_type: ElementType) -> (u32, u32) {
    match element_type {
        ElementType::I8 => (KIND_SIGNED_INT, 8),
        ElementType::I16 => (KIND_SIGNED_INT, 16),
        ElementType::I32 => (KIND_SIGNED_INT, 32),
        ElementType::I64 => (KIND_SIGNED_INT, 64),
        ElementType::U8 => (KIND_UNSIGNED_INT, 8),
        ElementType::F32 => (KIND_FLOAT, 32),
        ElementType::F64 => (KIND_FLOAT, 64),
        ElementType::Bool => (KIND_BOOL, 8),
    }
}

/// Encode values into one call payload.
pub fn encode(values: &[TensorValue]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, values.len() as u32);
    for value in values {
        push_u32(&mut out, value.shape().len() as u32);
        for dim in value.shape() {
            push_u32(&mut out, *dim as u32);
        }
        let (kind, bits) = kind_and_bits(value.element_type());
        push_u32(&mut out, kind);
        push_u32(&mut out, bits);
        push_elements(&mut out, value.data());
    }
    out
}

/// Decode a result payload. Empty input is an empty result sequence.
pub fn decode(bytes: &[u8]) -> WasmResult<Vec<TensorValue>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = Cursor { bytes, offset: 0 };
    let count = cursor.read_u32()?;
    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let rank = cursor.read_u32()?;
        let mut shape = Vec::with_capacity(rank as usize);
        for _ in 0..rank {
            shape.push(cursor.read_u32()? as usize);
        }
        let kind = cursor.read_u32()?;
        let bits = cursor.read_u32()?;
        let element_type = match (kind, bits) {
            (KIND_SIGNED_INT, 8) => ElementType::I8,
            (KIND_SIGNED_INT, 16) => ElementType::I16,
            (KIND_SIGNED_INT, 32) => ElementType::I32,
            (KIND_SIGNED_INT, 64) => ElementType::I64,
            (KIND_UNSIGNED_INT, 8) => ElementType::U8,
            (KIND_FLOAT, 32) => ElementType::F32,
            (KIND_FLOAT, 64) => ElementType::F64,
            (KIND_BOOL, 8) => ElementType::Bool,
            (kind, bits) => {
                return Err(WasmError::MalformedPayload(format!(
                    "unknown element kind/width {}/{}",
                    kind, bits
                )))
            }
        };

        let element_count: usize = shape.iter().product();
        let data = cursor.read_elements(element_type, element_count)?;
        let value = TensorValue::new(shape, data)
            .map_err(|e| WasmError::MalformedPayload(e.to_string()))?;
        values.push(value);
    }

    if cursor.offset != bytes.len() {
        return Err(WasmError::MalformedPayload(format!(
            "{} trailing bytes after {} tensors",
            bytes.len() - cursor.offset,
            count
        )));
    }
    Ok(values)
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_elements(out: &mut Vec<u8>, data: &TensorData) {
    match data {
        TensorData::I8(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::I16(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::I32(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::I64(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::U8(v) => out.extend_from_slice(v),
        TensorData::F32(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::F64(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
        TensorData::Bool(v) => v.iter().for_each(|x| out.push(u8::from(*x))),
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Cursor<'_> {
    fn take(&mut self, len: usize) -> WasmResult<&[u8]> {
        if self.offset + len > self.bytes.len() {
            return Err(WasmError::MalformedPayload(format!(
                "truncated payload: wanted {} bytes at offset {}, have {}",
                len,
                self.offset,
                self.bytes.len() - self.offset
            )));
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u32(&mut self) -> WasmResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_elements(
        &mut self,
        element_type: ElementType,
        count: usize,
    ) -> WasmResult<TensorData> {
        fn read_vec<const W: usize, T>(
            cursor: &mut Cursor<'_>,
            count: usize,
            convert: impl Fn([u8; W]) -> T,
        ) -> WasmResult<Vec<T>> {
            let bytes = cursor.take(count * W)?;
            Ok(bytes
                .chunks_exact(W)
                .map(|chunk| convert(chunk.try_into().unwrap()))
                .collect())
        }

        Ok(match element_type {
            ElementType::I8 => TensorData::I8(read_vec(self, count, i8::from_le_bytes)?),
            ElementType::I16 => TensorData::I16(read_vec(self, count, i16::from_le_bytes)?),
            ElementType::I32 => TensorData::I32(read_vec(self, count, i32::from_le_bytes)?),
            ElementType::I64 => TensorData::I64(read_vec(self, count, i64::from_le_bytes)?),
            ElementType::U8 => TensorData::U8(self.take(count)?.to_vec()),
            ElementType::F32 => TensorData::F32(read_vec(self, count, f32::from_le_bytes)?),
            ElementType::F64 => TensorData::F64(read_vec(self, count, f64::from_le_bytes)?),
            ElementType::Bool => {
                TensorData::Bool(self.take(count)?.iter().map(|b| *b != 0).collect())
            }
        })
    }
}
