// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::backends::wasm::WasmError;
use crate::compiler::CompileError;

/// Errors surfaced through the uniform façade call interface.
///
/// All failures propagate to the caller immediately; there are no retries.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// No backend with this name is registered.
    #[error("no backend named '{0}' is registered")]
    UnknownBackend(String),

    /// The module does not export a callable function with this name.
    #[error("module has no callable function named '{0}'")]
    MissingFunction(String),

    /// The name is exported, but not as an entry point the harness can
    /// invoke (wrong signature or not a function).
    #[error("export '{0}' is not an invocable entry point")]
    NotInvocable(String),

    /// A reference façade was requested for a definition that carries no
    /// native implementation.
    #[error("module '{module}' has no native implementation for backend '{backend}'")]
    NoNativeImplementation { backend: String, module: String },

    /// The underlying native module failed.
    #[error("native call to '{function}' failed: {error}")]
    Native {
        function: String,
        error: anyhow::Error,
    },

    /// The compiled-module runtime failed.
    #[error("compiled backend error: {0}")]
    Wasm(#[from] WasmError),

    /// Compilation failed while building a compiled façade.
    #[error(transparent)]
    Compile(#[from] CompileError),
}
