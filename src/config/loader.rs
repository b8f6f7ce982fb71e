// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::consts::{DEFAULT_FUEL_LEVEL, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL};
use crate::config::{BackendKind, BackendRegistry};

/// Top-level configuration for the harness.
///
/// Declares the backend table and compiled-execution limits. Typically
/// loaded from a YAML file:
///
/// ```yaml
/// wasm:
///   fuel:
///     default: 100000000
/// backends:
///   - name: native
///     kind: reference
///   - name: wasm32
///     kind: compiled
///     driver: wasmtime
///     compiler_targets: [wasm32]
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wasm: WasmConfig,
    pub backends: Vec<BackendEntry>,
}

/// One backend entry in the configuration file.
#[derive(Debug, Deserialize)]
pub struct BackendEntry {
    pub name: String,
    pub kind: BackendKind,
    pub driver: Option<String>,
    pub compiler_targets: Option<Vec<String>>,
}

/// Compiled-execution configuration options.
#[derive(Debug, Deserialize, Default)]
pub struct WasmConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
}

/// Fuel limits for compiled-module execution.
///
/// Fuel bounds the number of instructions one call may execute, so a broken
/// compiled module cannot hang a test run. Values are clamped to the
/// built-in security bounds.
#[derive(Debug, Deserialize, Default)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the default fuel level, using the built-in default if not configured.
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    /// Get the minimum fuel level, using the built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using the built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamp a requested fuel level to the configured bounds.
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        requested.clamp(self.get_minimum(), self.get_maximum())
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config from a YAML file and build a validated backend registry
/// from it.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<BackendRegistry, Box<dyn std::error::Error>> {
    let cfg = load_config(path)?;

    BackendRegistry::from_config(&cfg).map_err(|validation_errors| {
        let error_messages: Vec<String> =
            validation_errors.iter().map(|e| e.to_string()).collect();
        format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n")
        )
        .into()
    })
}
