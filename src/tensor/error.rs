// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::tensor::ElementType;

/// Errors from tensor construction and the textual dump format.
#[derive(Error, Debug)]
pub enum TensorError {
    /// The element type has no dump-format tag.
    #[error("expected an integer or floating element type, but got {0}")]
    UnsupportedElementType(ElementType),

    /// Shape and storage disagree about the number of elements.
    #[error("shape {shape:?} implies {expected} elements, storage holds {found}")]
    ElementCountMismatch {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },

    /// A dump entry is missing the `=` separating shape from values.
    #[error("malformed dump entry '{0}': missing '=' separator")]
    MissingSeparator(String),

    /// A dimension token in a dump entry is not a number.
    #[error("invalid dimension '{0}' in dump entry")]
    InvalidDimension(String),

    /// The type tag of a dump entry is not recognized.
    #[error("unknown element type tag '{0}'")]
    UnknownTypeTag(String),

    /// A value token cannot be parsed as the entry's element type.
    #[error("invalid {element_type} value '{token}'")]
    InvalidValue {
        token: String,
        element_type: ElementType,
    },

    /// A dump entry's value count does not match its shape.
    #[error("dump entry declares {expected} elements but carries {found} values")]
    ValueCountMismatch { expected: usize, found: usize },
}
