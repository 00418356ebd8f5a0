// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor implementations that can be wired into a dependency graph.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process Rust processors for text manipulation and analysis:
//! - **Text Transformation**: Case conversion, reversal, prefix/suffix addition, concatenation
//! - **Text Analysis**: Token counting, word frequency analysis
//!
//! Local processors are created by name through [`local::LocalProcessorFactory`], which is
//! what the configuration layer uses to turn a pipeline file into processor definitions.
//!
//! ## Stub Backend (Test-Only)
//! Scriptable fixtures for engine and builder tests, only compiled in test builds:
//! - **FixtureProcessor**: Declares arbitrary properties and returns canned outputs,
//!   failures, delays or panics
//! - **ExecutionTracker**: Records execution order
//!
//! # Examples
//!
//! ```rust
//! use processor_graph::backends::local::LocalProcessorFactory;
//! use processor_graph::config::ProcessorConfig;
//!
//! let config: ProcessorConfig = serde_yaml::from_str(
//!     "id: uppercase\nprocessor: change_text_case_upper\n",
//! )?;
//!
//! let processor = LocalProcessorFactory::create_processor(&config)?;
//! assert_eq!(processor.name(), "change_text_case_upper");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
