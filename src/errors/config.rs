// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur while validating a backend configuration table.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A compiled backend entry is missing its runtime driver.
    MissingDriver {
        /// The backend that has no driver.
        backend: String,
    },
    /// A compiled backend entry has no compiler targets.
    MissingCompilerTargets {
        /// The backend that has no targets.
        backend: String,
    },
    /// A backend names a driver the runtime does not provide.
    UnknownDriver {
        /// The backend with the unknown driver.
        backend: String,
        /// The driver name that couldn't be resolved.
        driver: String,
    },
    /// A reference backend entry carries compiler settings it cannot use.
    UnexpectedCompilerSettings {
        /// The reference backend carrying driver/target settings.
        backend: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingDriver { backend } => {
                write!(f, "Compiled backend '{}' has no driver", backend)
            }
            ValidationError::MissingCompilerTargets { backend } => {
                write!(f, "Compiled backend '{}' has no compiler targets", backend)
            }
            ValidationError::UnknownDriver { backend, driver } => {
                write!(
                    f,
                    "Backend '{}' names unknown driver '{}'",
                    backend, driver
                )
            }
            ValidationError::UnexpectedCompilerSettings { backend } => {
                write!(
                    f,
                    "Reference backend '{}' carries driver or compiler-target settings, which only apply to compiled backends",
                    backend
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
