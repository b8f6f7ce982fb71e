// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The compiled façade: runs a compiled artifact under the wasmtime driver.

pub mod abi;
mod error;
mod loader;
mod module;

pub use error::{WasmError, WasmResult};
pub use loader::{create_engine, load_blob};
pub use module::CompiledModule;
