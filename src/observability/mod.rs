// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log lines are never built from ad-hoc strings at the call site. Every event has a
//! message type with a `Display` implementation, so wording lives in one place and
//! the structured fields stay consistent between events.
//!
//! # Usage
//!
//! ```rust
//! use processor_graph::observability::messages::processor::ProcessorExecutionFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ProcessorExecutionFailed {
//!     processor_id: "createMap",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
