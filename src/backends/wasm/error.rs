// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for compiled-backend operations.
//!
//! Covers artifact loading and validation, engine configuration, call
//! marshaling across the module boundary, and runtime execution. All errors
//! implement `std::error::Error` via the `thiserror` crate.

use thiserror::Error;

/// Comprehensive error type for compiled-backend operations.
#[derive(Error, Debug)]
pub enum WasmError {
    /// The backend names a runtime driver this build does not provide.
    #[error("unknown runtime driver '{0}'")]
    UnknownDriver(String),

    /// Engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// Module compilation or instantiation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// Input validation error (size limits, required exports, etc.).
    #[error("Invalid compiled module: {0}")]
    ValidationError(String),

    /// Memory allocation or access error in linear memory.
    #[error("Memory error: {0}")]
    MemoryError(String),

    /// Result region outside valid memory bounds.
    #[error("Memory access out of bounds: {0}")]
    OutOfBounds(String),

    /// A result payload that does not follow the call convention.
    #[error("Malformed result payload: {0}")]
    MalformedPayload(String),

    /// File I/O error during artifact loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wasmtime runtime execution error.
    #[error("WASM execution error: {0}")]
    ExecutionError(#[from] wasmtime::Error),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),
}

/// Result type alias for compiled-backend operations.
pub type WasmResult<T> = Result<T, WasmError>;
