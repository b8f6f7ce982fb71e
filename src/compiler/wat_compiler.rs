// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The shipped compiler: lowers WebAssembly text to a binary module.
//!
//! Import reads the saved module's source, the pass pipeline normalizes and
//! verifies the text, and compilation assembles the binary and validates it
//! against the feature set implied by the requested targets (`wasm32-simd`
//! enables SIMD, plain `wasm32` rejects it).

use std::fs;
use std::path::Path;

use wasmparser::{Parser, Payload, Validator, WasmFeatures};

use crate::compiler::{CompileError, SavedModuleManifest};
use crate::config::consts::{KNOWN_COMPILER_TARGETS, MANIFEST_FILENAME, SOURCE_FILENAME};
use crate::traits::{Compiler, CompilerModule};

pub struct WatCompiler;

impl WatCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WatCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler for WatCompiler {
    fn load_saved_module(
        &self,
        path: &Path,
        exported_names: &[String],
    ) -> Result<Box<dyn CompilerModule>, CompileError> {
        let manifest_path = path.join(MANIFEST_FILENAME);
        if !manifest_path.exists() {
            return Err(CompileError::MalformedSavedModule {
                path: path.to_path_buf(),
                reason: format!("missing {}", MANIFEST_FILENAME),
            });
        }
        let manifest: SavedModuleManifest =
            serde_json::from_str(&fs::read_to_string(&manifest_path)?)?;

        let source_path = path.join(SOURCE_FILENAME);
        if !source_path.exists() {
            return Err(CompileError::MalformedSavedModule {
                path: path.to_path_buf(),
                reason: format!("missing {}", SOURCE_FILENAME),
            });
        }
        let text = fs::read_to_string(&source_path)?;

        tracing::debug!("Imported module '{}' from {}", manifest.name, path.display());
        Ok(Box::new(WatModule {
            text,
            exported_names: exported_names.to_vec(),
        }))
    }
}

struct WatModule {
    text: String,
    exported_names: Vec<String>,
}

impl CompilerModule for WatModule {
    fn to_text(&self) -> String {
        self.text.clone()
    }

    fn run_pass_pipeline(&mut self, passes: &[&str]) -> Result<(), CompileError> {
        for pass in passes {
            match *pass {
                "strip-comments" => {
                    self.text = strip_line_comments(&self.text);
                }
                "verify" => {
                    wat::parse_str(&self.text)
                        .map_err(|e| CompileError::InvalidSource(e.to_string()))?;
                }
                other => return Err(CompileError::UnknownPass(other.to_string())),
            }
        }
        Ok(())
    }

    fn compile(&self, target_backends: &[String]) -> Result<Vec<u8>, CompileError> {
        if target_backends.is_empty() {
            return Err(CompileError::NoTargets);
        }
        for target in target_backends {
            if !KNOWN_COMPILER_TARGETS.contains(&target.as_str()) {
                return Err(CompileError::UnknownTarget(target.clone()));
            }
        }

        let bytes =
            wat::parse_str(&self.text).map_err(|e| CompileError::InvalidSource(e.to_string()))?;

        let mut features = WasmFeatures::default();
        if !target_backends.iter().any(|t| t == "wasm32-simd") {
            features.remove(WasmFeatures::SIMD);
            features.remove(WasmFeatures::RELAXED_SIMD);
        }
        Validator::new_with_features(features)
            .validate_all(&bytes)
            .map_err(|e| CompileError::InvalidSource(e.to_string()))?;

        check_exported_names(&bytes, &self.exported_names)?;
        Ok(bytes)
    }
}

/// Remove `;;` line comments, preserving string literals.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_string = !in_string;
                out.push(ch);
            }
            '\\' if in_string => {
                out.push(ch);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            ';' if !in_string && chars.peek() == Some(&';') => {
                // Drop the rest of the line, keep the newline.
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Entry points named via `exported_names` must exist as function exports.
fn check_exported_names(bytes: &[u8], exported_names: &[String]) -> Result<(), CompileError> {
    if exported_names.is_empty() {
        return Ok(());
    }

    let mut exports = Vec::new();
    for payload in Parser::new(0).parse_all(bytes) {
        let payload = payload.map_err(|e| CompileError::InvalidSource(e.to_string()))?;
        if let Payload::ExportSection(reader) = payload {
            for export in reader {
                let export = export.map_err(|e| CompileError::InvalidSource(e.to_string()))?;
                if export.kind == wasmparser::ExternalKind::Func {
                    exports.push(export.name.to_string());
                }
            }
        }
    }

    for name in exported_names {
        if !exports.iter().any(|e| e == name) {
            return Err(CompileError::MissingExportedFunction(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::save_module;
    use crate::config::consts::IMPORT_PASS_PIPELINE;
    use crate::traits::ModuleDef;

    struct WatDef {
        name: &'static str,
        source: &'static str,
    }

    impl ModuleDef for WatDef {
        fn name(&self) -> &str {
            self.name
        }
        fn source(&self) -> &str {
            self.source
        }
    }

    const ANSWER_WAT: &str = r#"
(module
  ;; one exported entry point
  (func (export "answer") (result i32)
    i32.const 42))
"#;

    fn load(def: &WatDef, exported_names: &[String]) -> Box<dyn CompilerModule> {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("saved_model");
        save_module(def, &saved).unwrap();
        WatCompiler::new()
            .load_saved_module(&saved, exported_names)
            .unwrap()
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_load_missing_saved_module() {
        let dir = tempfile::tempdir().unwrap();
        let err = WatCompiler::new()
            .load_saved_module(&dir.path().join("nope"), &[])
            .err()
            .unwrap();
        assert!(matches!(err, CompileError::MalformedSavedModule { .. }));
    }

    #[test]
    fn test_strip_comments_pass() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };
        let mut module = load(&def, &[]);
        module.run_pass_pipeline(&["strip-comments"]).unwrap();
        let text = module.to_text();
        assert!(!text.contains(";;"));
        assert!(text.contains("i32.const 42"));
    }

    #[test]
    fn test_strip_comments_preserves_strings() {
        let stripped = strip_line_comments("(data (i32.const 0) \"a;;b\") ;; gone\n");
        assert!(stripped.contains("a;;b"));
        assert!(!stripped.contains("gone"));
    }

    #[test]
    fn test_unknown_pass() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };
        let mut module = load(&def, &[]);
        let err = module.run_pass_pipeline(&["fold-constants"]).unwrap_err();
        assert!(matches!(err, CompileError::UnknownPass(pass) if pass == "fold-constants"));
    }

    #[test]
    fn test_verify_pass_rejects_bad_source() {
        let def = WatDef {
            name: "broken",
            source: "(module (func",
        };
        let mut module = load(&def, &[]);
        let err = module.run_pass_pipeline(IMPORT_PASS_PIPELINE).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSource(_)));
    }

    #[test]
    fn test_compile_produces_wasm_binary() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };
        let mut module = load(&def, &[]);
        module.run_pass_pipeline(IMPORT_PASS_PIPELINE).unwrap();
        let blob = module.compile(&targets(&["wasm32"])).unwrap();
        assert_eq!(&blob[..4], b"\0asm");
    }

    #[test]
    fn test_compile_rejects_unknown_target() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };
        let module = load(&def, &[]);
        let err = module.compile(&targets(&["vulkan"])).unwrap_err();
        assert!(matches!(err, CompileError::UnknownTarget(t) if t == "vulkan"));
    }

    #[test]
    fn test_compile_rejects_empty_targets() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };
        let module = load(&def, &[]);
        assert!(matches!(
            module.compile(&[]).unwrap_err(),
            CompileError::NoTargets
        ));
    }

    #[test]
    fn test_exported_names_are_checked() {
        let def = WatDef {
            name: "answer",
            source: ANSWER_WAT,
        };

        let module = load(&def, &["answer".to_string()]);
        assert!(module.compile(&targets(&["wasm32"])).is_ok());

        let module = load(&def, &["missing".to_string()]);
        let err = module.compile(&targets(&["wasm32"])).unwrap_err();
        assert!(matches!(err, CompileError::MissingExportedFunction(name) if name == "missing"));
    }

    #[test]
    fn test_simd_requires_simd_target() {
        let def = WatDef {
            name: "simd",
            source: r#"
(module
  (func (export "zero") (result v128)
    v128.const i64x2 0 0))
"#,
        };

        let module = load(&def, &[]);
        let err = module.compile(&targets(&["wasm32"])).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSource(_)));

        let module = load(&def, &[]);
        assert!(module.compile(&targets(&["wasm32-simd"])).is_ok());
    }
}
