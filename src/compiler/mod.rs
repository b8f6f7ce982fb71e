// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The staged compile pipeline.
//!
//! A module definition is compiled in four stages: export to a saved-module
//! directory, import through the [`Compiler`] seam, a fixed import pass
//! pipeline, and final compilation to the target backends. When an
//! artifacts directory is provided every intermediate stage is persisted:
//!
//! * `saved_model/` - the exported module (manifest plus source)
//! * `tf_input.mlir` - imported module text, before the pass pipeline
//! * `iree_input.mlir` - module text after the pass pipeline
//! * `compiled__<backends>.vmfb` - the compiled blob, where `<backends>` is
//!   the sanitized, `__`-joined target list
//!
//! Without an artifacts directory the saved module round-trips through a
//! temporary directory that is removed afterwards.

mod artifacts;
mod error;
mod stub;
mod wat_compiler;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::consts::{
    FRONTEND_INPUT_FILENAME, IMPORTED_INPUT_FILENAME, IMPORT_PASS_PIPELINE, MANIFEST_FILENAME,
    SAVED_MODULE_DIRNAME, SOURCE_FILENAME,
};
use crate::observability::messages::compiler::{ArtifactSaved, CompilationCompleted};
use crate::traits::{Compiler, ModuleDef};

pub use artifacts::{backends_to_str, compiled_artifact_name, save_input_values, ArtifactError};
pub use error::CompileError;
pub use stub::{FailingCompiler, StubCompiler};
pub use wat_compiler::WatCompiler;

/// Metadata stored alongside the source in a saved-module directory.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedModuleManifest {
    pub name: String,
}

/// Export a module definition to a saved-module directory.
pub fn save_module(def: &dyn ModuleDef, dir: &Path) -> Result<(), CompileError> {
    fs::create_dir_all(dir)?;

    let manifest = SavedModuleManifest {
        name: def.name().to_string(),
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    fs::write(dir.join(MANIFEST_FILENAME), manifest_json)?;
    fs::write(dir.join(SOURCE_FILENAME), def.source())?;

    tracing::info!(
        "{}",
        ArtifactSaved {
            kind: "saved module",
            path: &dir.display().to_string(),
        }
    );
    Ok(())
}

/// Compile a module definition, optionally persisting every intermediate
/// artifact.
///
/// The returned blob is not callable on its own; see
/// [`crate::backends::wasm::CompiledModule`] for the façade that loads it
/// into the runtime.
///
/// `exported_names` restricts which entry points are considered for
/// compilation; empty means all.
pub fn compile_module(
    def: &dyn ModuleDef,
    compiler: &dyn Compiler,
    target_backends: &[String],
    exported_names: &[String],
    artifacts_dir: Option<&Path>,
) -> Result<Vec<u8>, CompileError> {
    let blob = match artifacts_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let saved_path = dir.join(SAVED_MODULE_DIRNAME);
            save_module(def, &saved_path)?;
            compile_from_path(compiler, &saved_path, target_backends, exported_names, Some(dir))?
        }
        None => {
            // Round-trip the saved module through a scratch directory.
            let scratch = tempfile::tempdir()?;
            let saved_path = scratch.path().join(SAVED_MODULE_DIRNAME);
            save_module(def, &saved_path)?;
            compile_from_path(compiler, &saved_path, target_backends, exported_names, None)?
        }
    };

    tracing::info!(
        "{}",
        CompilationCompleted {
            module: def.name(),
            targets: &backends_to_str(target_backends),
            size_bytes: blob.len(),
        }
    );
    Ok(blob)
}

fn compile_from_path(
    compiler: &dyn Compiler,
    saved_path: &Path,
    target_backends: &[String],
    exported_names: &[String],
    artifacts_dir: Option<&Path>,
) -> Result<Vec<u8>, CompileError> {
    let mut module = compiler.load_saved_module(saved_path, exported_names)?;

    if let Some(dir) = artifacts_dir {
        let path = dir.join(FRONTEND_INPUT_FILENAME);
        tracing::info!(
            "{}",
            ArtifactSaved {
                kind: "frontend input text",
                path: &path.display().to_string(),
            }
        );
        fs::write(&path, module.to_text())?;
    }

    module.run_pass_pipeline(IMPORT_PASS_PIPELINE)?;

    if let Some(dir) = artifacts_dir {
        let path = dir.join(IMPORTED_INPUT_FILENAME);
        tracing::info!(
            "{}",
            ArtifactSaved {
                kind: "imported input text",
                path: &path.display().to_string(),
            }
        );
        fs::write(&path, module.to_text())?;
    }

    let blob = module.compile(target_backends)?;

    if let Some(dir) = artifacts_dir {
        let path = dir.join(compiled_artifact_name(target_backends));
        tracing::info!(
            "{}",
            ArtifactSaved {
                kind: "compiled module",
                path: &path.display().to_string(),
            }
        );
        fs::write(&path, &blob)?;
    }

    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NativeModule;

    struct TextDef {
        name: String,
        source: String,
    }

    impl ModuleDef for TextDef {
        fn name(&self) -> &str {
            &self.name
        }
        fn source(&self) -> &str {
            &self.source
        }
        fn build_native(&self) -> Option<Box<dyn NativeModule>> {
            None
        }
    }

    fn test_def() -> TextDef {
        TextDef {
            name: "constants".to_string(),
            source: "(module)".to_string(),
        }
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_save_module_writes_manifest_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join(SAVED_MODULE_DIRNAME);
        save_module(&test_def(), &saved).unwrap();

        let manifest: SavedModuleManifest =
            serde_json::from_str(&fs::read_to_string(saved.join(MANIFEST_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(manifest.name, "constants");
        assert_eq!(
            fs::read_to_string(saved.join(SOURCE_FILENAME)).unwrap(),
            "(module)"
        );
    }

    #[test]
    fn test_artifact_saving_table_driven() {
        struct TestCase {
            name: &'static str,
            target_backends: Vec<String>,
        }

        let test_cases = vec![
            TestCase {
                name: "single_backend",
                target_backends: strings(&["vmla"]),
            },
            TestCase {
                name: "multiple_backends",
                target_backends: strings(&["vmla", "llvm-ir"]),
            },
        ];

        for test_case in test_cases {
            let dir = tempfile::tempdir().unwrap();
            let blob = compile_module(
                &test_def(),
                &StubCompiler::new(),
                &test_case.target_backends,
                &[],
                Some(dir.path()),
            )
            .unwrap();
            assert!(!blob.is_empty());

            let artifacts_to_check = vec![
                SAVED_MODULE_DIRNAME.to_string(),
                FRONTEND_INPUT_FILENAME.to_string(),
                IMPORTED_INPUT_FILENAME.to_string(),
                compiled_artifact_name(&test_case.target_backends),
            ];
            for artifact in artifacts_to_check {
                assert!(
                    dir.path().join(&artifact).exists(),
                    "Test case '{}': missing artifact '{}'",
                    test_case.name,
                    artifact
                );
            }
        }
    }

    #[test]
    fn test_compile_without_artifacts_dir() {
        let blob = compile_module(
            &test_def(),
            &StubCompiler::new(),
            &strings(&["vmla"]),
            &[],
            None,
        )
        .unwrap();
        assert!(!blob.is_empty());
    }

    #[test]
    fn test_compiler_failure_propagates() {
        let err = compile_module(
            &test_def(),
            &FailingCompiler,
            &strings(&["vmla"]),
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::InvalidSource(_)));
    }

    #[test]
    fn test_pass_pipeline_output_is_persisted() {
        // The stub compiler appends a marker line per pass, so the imported
        // text must differ from the frontend text.
        let dir = tempfile::tempdir().unwrap();
        compile_module(
            &test_def(),
            &StubCompiler::new(),
            &strings(&["vmla"]),
            &[],
            Some(dir.path()),
        )
        .unwrap();

        let frontend = fs::read_to_string(dir.path().join(FRONTEND_INPUT_FILENAME)).unwrap();
        let imported = fs::read_to_string(dir.path().join(IMPORTED_INPUT_FILENAME)).unwrap();
        assert_ne!(frontend, imported);
        for pass in IMPORT_PASS_PIPELINE {
            assert!(imported.contains(pass));
        }
    }
}
