// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The reference façade: runs a module's native implementation in-process.
//!
//! Nothing is compiled here. The façade exists to present the same call
//! interface as the compiled backend and to pin down the callable function
//! set at construction time.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::BackendInfo;
use crate::errors::FacadeError;
use crate::observability::messages::backend::{FacadeInstantiated, ModuleReinitialized};
use crate::tensor::TensorValue;
use crate::traits::{ModuleDef, ModuleFacade, NativeModule};

pub struct ReferenceModule {
    def: Arc<dyn ModuleDef>,
    info: BackendInfo,
    exported_names: Vec<String>,
    inner: Box<dyn NativeModule>,
    // Callable names, fixed at construction.
    functions: BTreeSet<String>,
}

impl ReferenceModule {
    /// Build a fresh native instance and enumerate its entry points.
    ///
    /// `exported_names` restricts the callable set; empty means every entry
    /// point the module exports.
    pub fn new(
        def: Arc<dyn ModuleDef>,
        info: BackendInfo,
        exported_names: &[String],
    ) -> Result<Self, FacadeError> {
        let inner = def
            .build_native()
            .ok_or_else(|| FacadeError::NoNativeImplementation {
                backend: info.name.clone(),
                module: def.name().to_string(),
            })?;

        let functions: BTreeSet<String> = inner
            .functions()
            .into_iter()
            .filter(|f| exported_names.is_empty() || exported_names.iter().any(|e| e == f))
            .collect();

        tracing::info!(
            "{}",
            FacadeInstantiated {
                backend: &info.name,
                module: def.name(),
                function_count: functions.len(),
            }
        );

        Ok(Self {
            def,
            info,
            exported_names: exported_names.to_vec(),
            inner,
            functions,
        })
    }
}

impl ModuleFacade for ReferenceModule {
    fn backend(&self) -> &BackendInfo {
        &self.info
    }

    fn functions(&self) -> Vec<String> {
        self.functions.iter().cloned().collect()
    }

    fn call(
        &mut self,
        function: &str,
        args: &[TensorValue],
    ) -> Result<Vec<TensorValue>, FacadeError> {
        if !self.functions.contains(function) {
            return Err(FacadeError::MissingFunction(function.to_string()));
        }
        self.inner
            .call(function, args)
            .map_err(|error| FacadeError::Native {
                function: function.to_string(),
                error,
            })
    }

    fn create_reinitialized(&self) -> Result<Box<dyn ModuleFacade>, FacadeError> {
        tracing::debug!(
            "{}",
            ModuleReinitialized {
                backend: &self.info.name,
                module: self.def.name(),
            }
        );
        let fresh = Self::new(self.def.clone(), self.info.clone(), &self.exported_names)?;
        Ok(Box::new(fresh))
    }
}
