// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for processor instantiation from configuration.

use thiserror::Error;

/// Errors that can occur while turning processor configuration into processor instances
#[derive(Debug, Error)]
pub enum ProcessorMapError {
    /// The named implementation is not known to the local backend
    #[error("Unknown processor implementation '{implementation}' for processor '{processor_id}'")]
    UnknownImplementation {
        processor_id: String,
        implementation: String,
    },

    /// An option was present but could not be used
    #[error("Invalid option '{option}' for processor '{processor_id}': {reason}")]
    InvalidOption {
        processor_id: String,
        option: String,
        reason: String,
    },
}
