// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // execution backends (reference + compiled)
pub mod compiler;   // staged compile pipeline + artifacts
pub mod config;     // config + backend registry
pub mod errors;     // error handling
pub mod observability;
pub mod random;     // seeded random sources
pub mod tensor;     // tensor values + dump format
pub mod traits;     // unified abstractions

#[cfg(test)]
mod integration_tests;
