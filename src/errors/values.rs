// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the values store, processor inputs and name mappings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuesError {
    /// The name was never written
    #[error("'{0}' has not been set")]
    NotSet(String),

    /// The stored value has a different type than requested
    #[error("'{name}' holds {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Write-once violated
    #[error("'{0}' has already been written")]
    DuplicateWrite(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameMappingError {
    #[error("local name '{local}' is mapped twice ('{existing}' and '{global}')")]
    DuplicateLocal {
        local: String,
        existing: String,
        global: String,
    },

    #[error("global name '{global}' is mapped from both '{existing}' and '{local}'")]
    DuplicateGlobal {
        global: String,
        existing: String,
        local: String,
    },
}
