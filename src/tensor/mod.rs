// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tensor values exchanged between execution backends.
//!
//! Backends agree on a single value representation: a shape plus typed,
//! flattened element storage. This module also owns the textual dump format
//! used for `inputs.txt` artifacts and CLI output.

mod dtype;
mod error;
mod text;
mod value;

pub use dtype::ElementType;
pub use error::TensorError;
pub use text::{format_entries, format_entry, parse_entries, parse_entry};
pub use value::{TensorData, TensorValue};
