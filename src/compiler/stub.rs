// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;

use crate::compiler::CompileError;
use crate::config::consts::{MANIFEST_FILENAME, SOURCE_FILENAME};
use crate::traits::{Compiler, CompilerModule};

/// A stub compiler implementation for testing and placeholder purposes.
///
/// It loads real saved-module directories but performs no lowering: passes
/// append marker lines to the text, and compilation emits a deterministic
/// placeholder blob.
pub struct StubCompiler;

impl StubCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler for StubCompiler {
    fn load_saved_module(
        &self,
        path: &Path,
        _exported_names: &[String],
    ) -> Result<Box<dyn CompilerModule>, CompileError> {
        if !path.join(MANIFEST_FILENAME).exists() {
            return Err(CompileError::MalformedSavedModule {
                path: path.to_path_buf(),
                reason: format!("missing {}", MANIFEST_FILENAME),
            });
        }
        let text = fs::read_to_string(path.join(SOURCE_FILENAME))?;
        Ok(Box::new(StubModule { text }))
    }
}

struct StubModule {
    text: String,
}

impl CompilerModule for StubModule {
    fn to_text(&self) -> String {
        self.text.clone()
    }

    fn run_pass_pipeline(&mut self, passes: &[&str]) -> Result<(), CompileError> {
        for pass in passes {
            self.text.push_str(&format!("\n;; pass: {}", pass));
        }
        Ok(())
    }

    fn compile(&self, target_backends: &[String]) -> Result<Vec<u8>, CompileError> {
        let mut blob = b"stub-compiled:".to_vec();
        blob.extend_from_slice(target_backends.join(",").as_bytes());
        Ok(blob)
    }
}

/// A compiler that always fails, for testing failure propagation.
pub struct FailingCompiler;

impl Compiler for FailingCompiler {
    fn load_saved_module(
        &self,
        _path: &Path,
        _exported_names: &[String],
    ) -> Result<Box<dyn CompilerModule>, CompileError> {
        Err(CompileError::InvalidSource(
            "simulated compiler failure".to_string(),
        ))
    }
}
