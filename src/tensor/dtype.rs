// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::tensor::TensorError;

/// Element types a [`crate::tensor::TensorValue`] can carry.
///
/// Unsigned and signed integers share the `i<bits>` type tag; the tag records
/// width and kind (integer vs float), not signedness. `Bool` values can cross
/// the backend boundary but have no tag in the dump format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    I8,
    I16,
    I32,
    I64,
    U8,
    F32,
    F64,
    Bool,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 | ElementType::Bool => 1,
            ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::F64 => 8,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ElementType::I8
                | ElementType::I16
                | ElementType::I32
                | ElementType::I64
                | ElementType::U8
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// The fixed-width tag used in the textual dump format: `i<bits>` for
    /// integer types, `f<bits>` for float types.
    ///
    /// Element types that are neither integer nor float are an error naming
    /// the offending type.
    pub fn type_tag(&self) -> Result<String, TensorError> {
        let bits = self.size_in_bytes() * 8;
        if self.is_integer() {
            Ok(format!("i{}", bits))
        } else if self.is_float() {
            Ok(format!("f{}", bits))
        } else {
            Err(TensorError::UnsupportedElementType(*self))
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementType::I8 => "i8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::U8 => "u8",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}
