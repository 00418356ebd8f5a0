// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it as a `tracing` event with its fields attached.
//!
//! * `graph` - graph building and validation events
//! * `engine` - run lifecycle events
//! * `processor` - per-node execution events
//!
//! # Usage Pattern
//!
//! ```rust
//! use processor_graph::observability::messages::StructuredLog;
//! use processor_graph::observability::messages::engine::ExecutionStarted;
//!
//! let msg = ExecutionStarted {
//!     node_count: 5,
//!     root_count: 2,
//!     max_concurrency: 4,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod graph;
pub mod processor;

/// A message that knows its own log level and structured fields
pub trait StructuredLog {
    /// Emit the message as a `tracing` event at its level
    fn log(&self);

    /// Open a span carrying the message's fields
    fn span(&self, name: &str) -> Span;
}
