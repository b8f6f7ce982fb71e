// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The compiled façade.
//!
//! Compiles a module definition through the staged pipeline, loads the blob
//! under the backend's runtime driver, and exposes the same call interface
//! as the reference façade. Arguments and results cross the boundary via
//! the call convention in [`crate::backends::wasm::abi`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use wasmtime::{Engine, ExternType, Instance, Memory, Module, Store, TypedFunc};

use crate::backends::wasm::abi;
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::loader::{create_engine, load_blob};
use crate::compiler::compile_module;
use crate::config::consts::WASMTIME_DRIVER;
use crate::config::BackendInfo;
use crate::errors::FacadeError;
use crate::observability::messages::backend::{FacadeInstantiated, ModuleReinitialized};
use crate::tensor::TensorValue;
use crate::traits::{Compiler, ModuleDef, ModuleFacade};

type EntryPoint = TypedFunc<(i32, i32), (i32, i32)>;

pub struct CompiledModule {
    def: Arc<dyn ModuleDef>,
    info: BackendInfo,
    exported_names: Vec<String>,
    fuel_level: u64,
    engine: Engine,
    module: Module,
    // All of the instance's mutable state lives in the store.
    store: Store<()>,
    memory: Memory,
    alloc: TypedFunc<i32, i32>,
    // Callable entry points, fixed at instantiation.
    functions: BTreeMap<String, EntryPoint>,
    // Exported functions whose signature does not match the call convention.
    non_invocable: BTreeSet<String>,
}

impl CompiledModule {
    /// Compile the definition for this backend's targets and load the
    /// result under its driver.
    ///
    /// `artifacts_dir` persists compilation artifacts when provided.
    pub fn compile_and_load(
        def: Arc<dyn ModuleDef>,
        info: BackendInfo,
        compiler: &dyn Compiler,
        exported_names: &[String],
        artifacts_dir: Option<&Path>,
        fuel_level: u64,
    ) -> Result<Self, FacadeError> {
        let targets = info.compiler_targets.clone().unwrap_or_default();
        let driver = info.driver.as_deref().unwrap_or(WASMTIME_DRIVER);

        let blob = compile_module(
            def.as_ref(),
            compiler,
            &targets,
            exported_names,
            artifacts_dir,
        )?;

        let engine = create_engine(driver, &targets).map_err(FacadeError::Wasm)?;
        let module = load_blob(&engine, &blob).map_err(FacadeError::Wasm)?;

        let parts =
            instantiate(&engine, &module, fuel_level, exported_names).map_err(FacadeError::Wasm)?;

        tracing::info!(
            "{}",
            FacadeInstantiated {
                backend: &info.name,
                module: def.name(),
                function_count: parts.functions.len(),
            }
        );

        Ok(Self {
            def,
            info,
            exported_names: exported_names.to_vec(),
            fuel_level,
            engine,
            module,
            store: parts.store,
            memory: parts.memory,
            alloc: parts.alloc,
            functions: parts.functions,
            non_invocable: parts.non_invocable,
        })
    }
}

impl ModuleFacade for CompiledModule {
    fn backend(&self) -> &BackendInfo {
        &self.info
    }

    fn functions(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    fn call(
        &mut self,
        function: &str,
        args: &[TensorValue],
    ) -> Result<Vec<TensorValue>, FacadeError> {
        let entry = match self.functions.get(function) {
            Some(entry) => entry.clone(),
            None if self.non_invocable.contains(function) => {
                return Err(FacadeError::NotInvocable(function.to_string()))
            }
            None => return Err(FacadeError::MissingFunction(function.to_string())),
        };

        // Fresh computational budget for every call.
        self.store
            .set_fuel(self.fuel_level)
            .map_err(WasmError::from)?;

        let input = abi::encode(args);
        let in_ptr = if input.is_empty() {
            0
        } else {
            let ptr = self
                .alloc
                .call(&mut self.store, input.len() as i32)
                .map_err(WasmError::from)?;
            if ptr == 0 {
                return Err(WasmError::MemoryError(
                    "allocation for the input payload failed".to_string(),
                )
                .into());
            }
            self.memory
                .write(&mut self.store, ptr as usize, &input)
                .map_err(|e| WasmError::MemoryError(e.to_string()))?;
            ptr
        };

        let (out_ptr, out_len) = entry
            .call(&mut self.store, (in_ptr, input.len() as i32))
            .map_err(WasmError::from)?;
        if out_ptr < 0 || out_len < 0 {
            return Err(WasmError::OutOfBounds(format!(
                "result region ({}, {})",
                out_ptr, out_len
            ))
            .into());
        }

        let mut output = vec![0u8; out_len as usize];
        if out_len > 0 {
            self.memory
                .read(&self.store, out_ptr as usize, &mut output)
                .map_err(|e| WasmError::OutOfBounds(e.to_string()))?;
        }

        Ok(abi::decode(&output)?)
    }

    /// Duplicate this module with its initial state, reusing the already
    /// compiled artifact.
    fn create_reinitialized(&self) -> Result<Box<dyn ModuleFacade>, FacadeError> {
        tracing::debug!(
            "{}",
            ModuleReinitialized {
                backend: &self.info.name,
                module: self.def.name(),
            }
        );

        let parts = instantiate(
            &self.engine,
            &self.module,
            self.fuel_level,
            &self.exported_names,
        )
        .map_err(FacadeError::Wasm)?;

        Ok(Box::new(Self {
            def: self.def.clone(),
            info: self.info.clone(),
            exported_names: self.exported_names.clone(),
            fuel_level: self.fuel_level,
            engine: self.engine.clone(),
            module: self.module.clone(),
            store: parts.store,
            memory: parts.memory,
            alloc: parts.alloc,
            functions: parts.functions,
            non_invocable: parts.non_invocable,
        }))
    }
}

struct InstanceParts {
    store: Store<()>,
    memory: Memory,
    alloc: TypedFunc<i32, i32>,
    functions: BTreeMap<String, EntryPoint>,
    non_invocable: BTreeSet<String>,
}

/// Instantiate the module and populate the entry-point map from its
/// exports.
fn instantiate(
    engine: &Engine,
    module: &Module,
    fuel_level: u64,
    exported_names: &[String],
) -> WasmResult<InstanceParts> {
    let mut store = Store::new(engine, ());
    // Instantiation itself consumes fuel.
    store.set_fuel(fuel_level)?;

    let instance = Instance::new(&mut store, module, &[])?;

    let memory = instance
        .get_memory(&mut store, "memory")
        .ok_or_else(|| WasmError::ValidationError("compiled module must export 'memory'".into()))?;
    let alloc = instance
        .get_typed_func::<i32, i32>(&mut store, "alloc")
        .map_err(|_| {
            WasmError::ValidationError(
                "compiled module must export 'alloc' with signature (i32) -> i32".into(),
            )
        })?;

    let mut functions = BTreeMap::new();
    let mut non_invocable = BTreeSet::new();
    for export in module.exports() {
        if !matches!(export.ty(), ExternType::Func(_)) {
            continue;
        }
        let name = export.name();
        if name == "alloc" {
            continue;
        }
        let exported = exported_names.is_empty() || exported_names.iter().any(|e| e == name);
        if !exported {
            continue;
        }
        match instance.get_typed_func::<(i32, i32), (i32, i32)>(&mut store, name) {
            Ok(entry) => {
                functions.insert(name.to_string(), entry);
            }
            Err(_) => {
                non_invocable.insert(name.to_string());
            }
        }
    }

    Ok(InstanceParts {
        store,
        memory,
        alloc,
        functions,
        non_invocable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::WatCompiler;
    use crate::tensor::TensorData;
    use crate::traits::NativeModule;

    /// Scratch space starts above the module's data segments.
    const ECHO_WAT: &str = r#"
(module
  (memory (export "memory") 1)
  (global $heap (mut i32) (i32.const 2048))
  (func (export "alloc") (param $size i32) (result i32)
    (local $ptr i32)
    global.get $heap
    local.set $ptr
    (global.set $heap (i32.add (global.get $heap) (local.get $size)))
    local.get $ptr)
  (func (export "echo") (param $ptr i32) (param $len i32) (result i32 i32)
    local.get $ptr
    local.get $len)
  (func (export "weird") (result i32)
    i32.const 1))
"#;

    struct EchoDef;

    impl ModuleDef for EchoDef {
        fn name(&self) -> &str {
            "echo"
        }
        fn source(&self) -> &str {
            ECHO_WAT
        }
        fn build_native(&self) -> Option<Box<dyn NativeModule>> {
            None
        }
    }

    fn echo_facade(exported_names: &[String]) -> CompiledModule {
        CompiledModule::compile_and_load(
            Arc::new(EchoDef),
            BackendInfo::compiled("wasm32", WASMTIME_DRIVER, &["wasm32"]),
            &WatCompiler::new(),
            exported_names,
            None,
            crate::config::consts::DEFAULT_FUEL_LEVEL,
        )
        .unwrap()
    }

    #[test]
    fn test_function_map_excludes_abi_helpers() {
        let facade = echo_facade(&[]);
        assert_eq!(facade.functions(), vec!["echo"]);
    }

    #[test]
    fn test_echo_round_trips_arguments() {
        let mut facade = echo_facade(&[]);
        let args = vec![
            TensorValue::new(vec![2, 3], TensorData::F32(vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]))
                .unwrap(),
            TensorValue::vector(TensorData::I32(vec![7, -9])),
        ];
        let results = facade.call("echo", &args).unwrap();
        assert_eq!(results, args);
    }

    #[test]
    fn test_echo_with_no_arguments() {
        let mut facade = echo_facade(&[]);
        // An empty argument list still encodes a count header, which echoes
        // back as zero tensors.
        let results = facade.call("echo", &[]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_function_error_names_it() {
        let mut facade = echo_facade(&[]);
        let err = facade.call("quack", &[]).unwrap_err();
        assert!(matches!(err, FacadeError::MissingFunction(name) if name == "quack"));
    }

    #[test]
    fn test_wrong_signature_export_is_not_invocable() {
        let mut facade = echo_facade(&[]);
        let err = facade.call("weird", &[]).unwrap_err();
        assert!(matches!(err, FacadeError::NotInvocable(name) if name == "weird"));
    }

    #[test]
    fn test_exported_names_filter() {
        let mut facade = echo_facade(&["weird".to_string()]);
        let err = facade.call("echo", &[]).unwrap_err();
        assert!(matches!(err, FacadeError::MissingFunction(_)));
    }
}
