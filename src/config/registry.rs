use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::backends::reference::ReferenceModule;
use crate::backends::wasm::CompiledModule;
use crate::compiler::WatCompiler;
use crate::config::consts::{DEFAULT_FUEL_LEVEL, WASMTIME_DRIVER};
use crate::config::Config;
use crate::errors::{FacadeError, ValidationError};
use crate::traits::{ModuleDef, ModuleFacade};

/// Which façade type a backend builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Runs the module's native implementation in-process.
    Reference,
    /// Compiles the module and runs the artifact under a runtime driver.
    Compiled,
}

/// Info record describing a backend: its name, which façade it builds, the
/// runtime driver, and the compiler targets to compile for.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendInfo {
    pub name: String,
    pub kind: BackendKind,
    pub driver: Option<String>,
    pub compiler_targets: Option<Vec<String>>,
}

impl BackendInfo {
    pub fn reference(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: BackendKind::Reference,
            driver: None,
            compiler_targets: None,
        }
    }

    pub fn compiled(name: &str, driver: &str, compiler_targets: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: BackendKind::Compiled,
            driver: Some(driver.to_string()),
            compiler_targets: Some(compiler_targets.iter().map(|t| t.to_string()).collect()),
        }
    }

    /// Build the matching façade for a module definition.
    ///
    /// `exported_names` restricts the callable/compiled entry points; empty
    /// means all. `artifacts_dir` persists compilation artifacts for
    /// compiled backends and is ignored by reference backends, which compile
    /// nothing.
    pub fn instantiate(
        &self,
        def: Arc<dyn ModuleDef>,
        exported_names: &[String],
        artifacts_dir: Option<&Path>,
        fuel_level: u64,
    ) -> Result<Box<dyn ModuleFacade>, FacadeError> {
        match self.kind {
            BackendKind::Reference => {
                let facade = ReferenceModule::new(def, self.clone(), exported_names)?;
                Ok(Box::new(facade))
            }
            BackendKind::Compiled => {
                let compiler = WatCompiler::new();
                let facade = CompiledModule::compile_and_load(
                    def,
                    self.clone(),
                    &compiler,
                    exported_names,
                    artifacts_dir,
                    fuel_level,
                )?;
                Ok(Box::new(facade))
            }
        }
    }
}

/// Name-keyed table of backend configurations.
///
/// Built once at startup (defaults or a config file) and passed by
/// reference to consumers. Lookup returns the exact registered record;
/// duplicate registrations keep the last entry.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: BTreeMap<String, BackendInfo>,
    fuel_level: u64,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: BTreeMap::new(),
            fuel_level: DEFAULT_FUEL_LEVEL,
        }
    }

    /// The default backend table.
    ///
    /// `native_also` is a second reference entry so suites can instantiate
    /// the same module twice and catch initialization or randomization
    /// nondeterminism between fresh instances.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add(BackendInfo::reference("native"));
        registry.add(BackendInfo::reference("native_also"));
        registry.add(BackendInfo::compiled("wasm32", WASMTIME_DRIVER, &["wasm32"]));
        registry.add(BackendInfo::compiled(
            "wasm32_simd",
            WASMTIME_DRIVER,
            &["wasm32-simd"],
        ));
        registry
    }

    /// Build a registry from a loaded config file, validating every entry.
    pub fn from_config(cfg: &Config) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut registry = Self::new();
        registry.fuel_level = cfg.wasm.fuel.validate_and_clamp(cfg.wasm.fuel.get_default());

        for entry in &cfg.backends {
            let info = BackendInfo {
                name: entry.name.clone(),
                kind: entry.kind,
                driver: entry.driver.clone(),
                compiler_targets: entry.compiler_targets.clone(),
            };
            errors.extend(validate_backend(&info));
            registry.add(info);
        }

        if errors.is_empty() {
            Ok(registry)
        } else {
            Err(errors)
        }
    }

    /// Register a backend. The last entry wins on duplicate names.
    pub fn add(&mut self, info: BackendInfo) {
        self.backends.insert(info.name.clone(), info);
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<&BackendInfo> {
        self.backends.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.backends.keys()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn fuel_level(&self) -> u64 {
        self.fuel_level
    }

    /// Look up a backend and build its façade for a module definition.
    pub fn instantiate(
        &self,
        backend_name: &str,
        def: Arc<dyn ModuleDef>,
        exported_names: &[String],
        artifacts_dir: Option<&Path>,
    ) -> Result<Box<dyn ModuleFacade>, FacadeError> {
        let info = self
            .get(backend_name)
            .ok_or_else(|| FacadeError::UnknownBackend(backend_name.to_string()))?;
        info.instantiate(def, exported_names, artifacts_dir, self.fuel_level)
    }
}

fn validate_backend(info: &BackendInfo) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match info.kind {
        BackendKind::Compiled => {
            match &info.driver {
                None => errors.push(ValidationError::MissingDriver {
                    backend: info.name.clone(),
                }),
                Some(driver) if driver != WASMTIME_DRIVER => {
                    errors.push(ValidationError::UnknownDriver {
                        backend: info.name.clone(),
                        driver: driver.clone(),
                    })
                }
                Some(_) => {}
            }
            if info
                .compiler_targets
                .as_ref()
                .map_or(true, |targets| targets.is_empty())
            {
                errors.push(ValidationError::MissingCompilerTargets {
                    backend: info.name.clone(),
                });
            }
        }
        BackendKind::Reference => {
            if info.driver.is_some() || info.compiler_targets.is_some() {
                errors.push(ValidationError::UnexpectedCompilerSettings {
                    backend: info.name.clone(),
                });
            }
        }
    }
    errors
}
