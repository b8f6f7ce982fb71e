// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod facade;

pub use config::ValidationError;
pub use facade::FacadeError;
