// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cross-backend integration tests.
//!
//! One module definition with both a native implementation and compiled
//! source, exercised through the registry on the reference and compiled
//! backends.

use std::sync::Arc;

use crate::compiler::{compiled_artifact_name, save_input_values};
use crate::config::consts::{
    FRONTEND_INPUT_FILENAME, IMPORTED_INPUT_FILENAME, INPUTS_FILENAME, SAVED_MODULE_DIRNAME,
};
use crate::config::BackendRegistry;
use crate::random::RandomSources;
use crate::tensor::{ElementType, TensorData, TensorValue};
use crate::traits::{ModuleDef, ModuleFacade, NativeModule};

/// Stateful counter, in the compiled call convention.
///
/// The count lives at offset 1044, inside a pre-encoded result payload at
/// 1024 (one f32 tensor of shape [1]); scratch allocations start at 2048.
const COUNTER_WAT: &str = r#"
(module
  (memory (export "memory") 1)
  (global $heap (mut i32) (i32.const 2048))
  (data (i32.const 1024)
    "\01\00\00\00\01\00\00\00\01\00\00\00\02\00\00\00\20\00\00\00\00\00\00\00")
  (func (export "alloc") (param $size i32) (result i32)
    (local $ptr i32)
    global.get $heap
    local.set $ptr
    (global.set $heap (i32.add (global.get $heap) (local.get $size)))
    local.get $ptr)
  (func (export "get_count") (param i32 i32) (result i32 i32)
    i32.const 1024
    i32.const 24)
  (func (export "increment") (param i32 i32) (result i32 i32)
    (f32.store (i32.const 1044)
      (f32.add (f32.load (i32.const 1044)) (f32.const 1)))
    i32.const 0
    i32.const 0))
"#;

struct NativeCounter {
    count: f32,
}

impl NativeModule for NativeCounter {
    fn functions(&self) -> Vec<String> {
        vec!["get_count".to_string(), "increment".to_string()]
    }

    fn call(&mut self, function: &str, _args: &[TensorValue]) -> anyhow::Result<Vec<TensorValue>> {
        match function {
            "get_count" => Ok(vec![TensorValue::vector(TensorData::F32(vec![self.count]))]),
            "increment" => {
                self.count += 1.0;
                Ok(vec![])
            }
            other => anyhow::bail!("no function '{}'", other),
        }
    }
}

struct CounterDef;

impl ModuleDef for CounterDef {
    fn name(&self) -> &str {
        "counter"
    }
    fn source(&self) -> &str {
        COUNTER_WAT
    }
    fn build_native(&self) -> Option<Box<dyn NativeModule>> {
        Some(Box::new(NativeCounter { count: 0.0 }))
    }
}

fn count_of(facade: &mut dyn ModuleFacade) -> f32 {
    let results = facade.call("get_count", &[]).unwrap();
    assert_eq!(results.len(), 1, "get_count must return one tensor");
    assert_eq!(results[0].shape(), &[1]);
    match results[0].data() {
        TensorData::F32(v) => v[0],
        other => panic!("unexpected result storage: {:?}", other),
    }
}

#[test]
fn test_unaltered_state_table_driven() {
    let registry = BackendRegistry::with_defaults();

    for backend_name in ["native", "wasm32"] {
        let mut module = registry
            .instantiate(backend_name, Arc::new(CounterDef), &[], None)
            .unwrap();

        // Incrementing works.
        assert_eq!(count_of(module.as_mut()), 0.0, "backend '{}'", backend_name);
        module.call("increment", &[]).unwrap();
        assert_eq!(count_of(module.as_mut()), 1.0, "backend '{}'", backend_name);

        let mut reinitialized = module.create_reinitialized().unwrap();
        // Reinitialization starts from the initial state.
        assert_eq!(
            count_of(reinitialized.as_mut()),
            0.0,
            "backend '{}'",
            backend_name
        );
        // The two instances hold independent state.
        assert_eq!(count_of(module.as_mut()), 1.0, "backend '{}'", backend_name);
    }
}

#[test]
fn test_backends_expose_the_same_functions() {
    let registry = BackendRegistry::with_defaults();
    let native = registry
        .instantiate("native", Arc::new(CounterDef), &[], None)
        .unwrap();
    let compiled = registry
        .instantiate("wasm32", Arc::new(CounterDef), &[], None)
        .unwrap();
    assert_eq!(native.functions(), compiled.functions());
}

#[test]
fn test_cross_backend_agreement() {
    let registry = BackendRegistry::with_defaults();
    let mut native = registry
        .instantiate("native", Arc::new(CounterDef), &[], None)
        .unwrap();
    let mut compiled = registry
        .instantiate("wasm32", Arc::new(CounterDef), &[], None)
        .unwrap();

    for _ in 0..5 {
        native.call("increment", &[]).unwrap();
        compiled.call("increment", &[]).unwrap();

        let reference = native.call("get_count", &[]).unwrap();
        let under_test = compiled.call("get_count", &[]).unwrap();
        assert_eq!(reference.len(), under_test.len());
        for (r, t) in reference.iter().zip(&under_test) {
            assert!(
                r.allclose(t, 1e-5, 1e-5),
                "backends disagree: {:?} vs {:?}",
                r,
                t
            );
        }
    }
}

#[test]
fn test_artifact_saving_end_to_end() {
    let registry = BackendRegistry::with_defaults();
    let artifacts_dir = tempfile::tempdir().unwrap();

    let mut sources = RandomSources::seeded(0);
    let inputs = vec![TensorValue::random_uniform(
        vec![2, 3],
        ElementType::F32,
        &mut sources.data,
    )];
    save_input_values(&inputs, Some(artifacts_dir.path())).unwrap();

    registry
        .instantiate(
            "wasm32",
            Arc::new(CounterDef),
            &[],
            Some(artifacts_dir.path()),
        )
        .unwrap();

    let artifacts_to_check = vec![
        INPUTS_FILENAME.to_string(),
        SAVED_MODULE_DIRNAME.to_string(),
        FRONTEND_INPUT_FILENAME.to_string(),
        IMPORTED_INPUT_FILENAME.to_string(),
        compiled_artifact_name(&["wasm32"]),
    ];
    for artifact in artifacts_to_check {
        assert!(
            artifacts_dir.path().join(&artifact).exists(),
            "missing artifact '{}'",
            artifact
        );
    }
}

#[test]
fn test_exported_names_restrict_both_backends() {
    let registry = BackendRegistry::with_defaults();
    let exported = vec!["get_count".to_string()];

    for backend_name in ["native", "wasm32"] {
        let mut module = registry
            .instantiate(backend_name, Arc::new(CounterDef), &exported, None)
            .unwrap();
        assert_eq!(module.functions(), vec!["get_count"]);
        let err = module.call("increment", &[]).unwrap_err();
        assert!(
            err.to_string().contains("increment"),
            "backend '{}': error should name the function: {}",
            backend_name,
            err
        );
    }
}
