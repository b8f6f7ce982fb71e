// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine configuration and compiled-artifact loading.

use wasmtime::{Config, Engine, Module};

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::config::consts::{MAX_COMPILED_MODULE_SIZE, WASMTIME_DRIVER};

/// Create an engine for the given runtime driver and compiler targets.
///
/// The target list selects the feature set: `wasm32-simd` enables SIMD,
/// everything else runs with it disabled. Fuel consumption is always on so
/// a runaway compiled module stops instead of hanging the test run.
pub fn create_engine(driver: &str, compiler_targets: &[String]) -> WasmResult<Engine> {
    if driver != WASMTIME_DRIVER {
        return Err(WasmError::UnknownDriver(driver.to_string()));
    }

    let simd = compiler_targets.iter().any(|t| t == "wasm32-simd");

    let mut config = Config::new();
    config.wasm_threads(false);
    config.wasm_simd(simd);
    config.wasm_relaxed_simd(false);
    config.wasm_multi_memory(false);
    config.wasm_memory64(false);
    config.consume_fuel(true);
    config.epoch_interruption(false);

    Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
}

/// Load a compiled blob into the engine, validating size and structure
/// first.
pub fn load_blob(engine: &Engine, blob: &[u8]) -> WasmResult<Module> {
    if blob.len() > MAX_COMPILED_MODULE_SIZE {
        return Err(WasmError::ValidationError(format!(
            "compiled module too large: {} bytes (max: {} bytes)",
            blob.len(),
            MAX_COMPILED_MODULE_SIZE
        )));
    }

    wasmparser::Validator::new().validate_all(blob)?;

    Module::new(engine, blob).map_err(|e| WasmError::ModuleError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let engine = create_engine(WASMTIME_DRIVER, &["wasm32".to_string()]);
        assert!(engine.is_ok());
    }

    #[test]
    fn test_unknown_driver() {
        let result = create_engine("vulkan", &[]);
        assert!(matches!(result, Err(WasmError::UnknownDriver(d)) if d == "vulkan"));
    }

    #[test]
    fn test_blob_size_validation() {
        let engine = create_engine(WASMTIME_DRIVER, &[]).unwrap();
        let oversized = vec![0u8; MAX_COMPILED_MODULE_SIZE + 1];
        let result = load_blob(&engine, &oversized);
        if let Err(WasmError::ValidationError(msg)) = result {
            assert!(msg.contains("too large"));
        } else {
            panic!("Expected ValidationError for oversized blob");
        }
    }

    #[test]
    fn test_blob_structure_validation() {
        let engine = create_engine(WASMTIME_DRIVER, &[]).unwrap();
        let result = load_blob(&engine, b"not a wasm module");
        assert!(matches!(result, Err(WasmError::ParserError(_))));
    }

    #[test]
    fn test_load_valid_blob() {
        let engine = create_engine(WASMTIME_DRIVER, &[]).unwrap();
        let blob = wat::parse_str("(module)").unwrap();
        assert!(load_blob(&engine, &blob).is_ok());
    }
}
