// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for façade instantiation and lifecycle events.

use std::fmt::{Display, Formatter};

/// A module façade was built for a backend.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use crosscheck::observability::messages::backend::FacadeInstantiated;
///
/// let msg = FacadeInstantiated {
///     backend: "wasm32",
///     module: "counter",
///     function_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FacadeInstantiated<'a> {
    pub backend: &'a str,
    pub module: &'a str,
    pub function_count: usize,
}

impl Display for FacadeInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Instantiated module '{}' on backend '{}': {} callable functions",
            self.module, self.backend, self.function_count
        )
    }
}

/// A façade was duplicated back to its initial state.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ModuleReinitialized<'a> {
    pub backend: &'a str,
    pub module: &'a str,
}

impl Display for ModuleReinitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reinitialized module '{}' on backend '{}'",
            self.module, self.backend
        )
    }
}
