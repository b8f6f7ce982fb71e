// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Centralized message types for diagnostic and operational logging. Message
//! types follow a struct-based pattern with a `Display` implementation to
//! keep log wording in one place and out of the call sites.
//!
//! Messages are organized by subsystem:
//! * `messages::compiler` - compile pipeline and artifact events
//! * `messages::backend` - façade instantiation and lifecycle events

pub mod messages;
