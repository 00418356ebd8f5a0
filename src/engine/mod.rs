// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run-time execution of dependency graphs.
//!
//! A [`DependencyGraph`](crate::graph::DependencyGraph) is built once and shared;
//! every request creates a fresh [`ExecutionTask`] over its own
//! [`Values`](crate::values::Values) store.
//!
//! # Examples
//!
//! ```rust
//! use processor_graph::graph::GraphBuilder;
//! use processor_graph::values::Values;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = GraphBuilder::build(Vec::new(), ["text"]).map_err(|e| format!("{:?}", e))?;
//!
//! let values = Values::new();
//! values.put("text", "hello".to_string())?;
//!
//! let summary = graph.create_task(values.clone()).run().await?;
//! assert_eq!(summary.executed, 0);
//! # Ok(())
//! # }
//! ```

mod options;
mod task;

pub use options::ExecutorOptions;
pub use task::{ExecutionSummary, ExecutionTask};
