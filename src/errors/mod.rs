// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod processor;
mod processor_map;
mod values;

pub use config::{ConfigError, PropertyDirection, ValidationError};
pub use execution::{ExecutionError, FailureStrategy};
pub use processor::ProcessorError;
pub use processor_map::ProcessorMapError;
pub use values::{NameMappingError, ValuesError};
