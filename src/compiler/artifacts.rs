// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Artifact naming and input-value dumps.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::consts::{COMPILED_EXTENSION, COMPILED_PREFIX, INPUTS_FILENAME};
use crate::observability::messages::compiler::ArtifactSaved;
use crate::tensor::{format_entries, TensorError, TensorValue};

/// Errors from writing artifact files.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flatten target backend names into one artifact-safe token.
///
/// Each name is sanitized to `[0-9a-zA-Z_]` (runs of any other characters
/// collapse into a single underscore), stripped of leading and trailing
/// underscores, and the results are joined with `__`.
pub fn backends_to_str<S: AsRef<str>>(target_backends: &[S]) -> String {
    let normalized: Vec<String> = target_backends
        .iter()
        .map(|backend| normalize_backend_name(backend.as_ref()))
        .collect();
    normalized.join("__")
}

fn normalize_backend_name(backend: &str) -> String {
    let mut normalized = String::with_capacity(backend.len());
    let mut in_run = false;
    for ch in backend.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            normalized.push(ch);
            in_run = false;
        } else if !in_run {
            normalized.push('_');
            in_run = true;
        }
    }
    normalized.trim_matches('_').to_string()
}

/// File name of the compiled artifact for the given targets.
pub fn compiled_artifact_name<S: AsRef<str>>(target_backends: &[S]) -> String {
    format!(
        "{}{}.{}",
        COMPILED_PREFIX,
        backends_to_str(target_backends),
        COMPILED_EXTENSION
    )
}

/// Format input values as a dump, and persist them when an artifacts
/// directory is given.
///
/// The file (`inputs.txt`) gets a trailing newline; the returned string does
/// not.
pub fn save_input_values(
    inputs: &[TensorValue],
    artifacts_dir: Option<&Path>,
) -> Result<String, ArtifactError> {
    let dump = format_entries(inputs)?;
    if let Some(dir) = artifacts_dir {
        let inputs_path = dir.join(INPUTS_FILENAME);
        tracing::info!(
            "{}",
            ArtifactSaved {
                kind: "input values",
                path: &inputs_path.display().to_string(),
            }
        );
        fs::write(&inputs_path, format!("{}\n", dump))?;
    }
    Ok(dump)
}
