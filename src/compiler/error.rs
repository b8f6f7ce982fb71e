// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the compile pipeline and toolchain seams.
///
/// There are no retries; every failure propagates to the caller.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A requested compiler target is not recognized by the toolchain.
    #[error("unknown compiler target '{0}'")]
    UnknownTarget(String),

    /// Compilation was requested with an empty target list.
    #[error("no compiler targets requested")]
    NoTargets,

    /// A pass pipeline names a pass the toolchain does not provide.
    #[error("unknown import pass '{0}'")]
    UnknownPass(String),

    /// The module source failed to parse or verify.
    #[error("invalid module source: {0}")]
    InvalidSource(String),

    /// An entry point requested via `exported_names` does not exist in the
    /// compiled module.
    #[error("exported function '{0}' is not present in the compiled module")]
    MissingExportedFunction(String),

    /// A saved-module directory is missing files or carries bad metadata.
    #[error("saved module at '{path}' is malformed: {reason}")]
    MalformedSavedModule { path: PathBuf, reason: String },

    /// File I/O error while saving or loading artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Saved-module manifest (de)serialization error.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
