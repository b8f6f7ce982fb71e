// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for compile pipeline and artifact events.

use std::fmt::{Display, Formatter};

/// A compilation artifact was written to disk.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use crosscheck::observability::messages::compiler::ArtifactSaved;
///
/// let msg = ArtifactSaved {
///     kind: "input values",
///     path: "/tmp/artifacts/inputs.txt",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ArtifactSaved<'a> {
    pub kind: &'a str,
    pub path: &'a str,
}

impl Display for ArtifactSaved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Saving {} to: {}", self.kind, self.path)
    }
}

/// A module finished compiling for its target backends.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CompilationCompleted<'a> {
    pub module: &'a str,
    pub targets: &'a str,
    pub size_bytes: usize,
}

impl Display for CompilationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled module '{}' for [{}]: {} bytes",
            self.module, self.targets, self.size_bytes
        )
    }
}
