// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::{ProcessorError, ValuesError};
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

pub const DEFAULT_SEPARATOR: &str = " ";

/// Concatenate processor - joins `first` and `second` into `combined`.
///
/// A null `second` yields `first` unchanged; this is how a pipeline joins an
/// optional branch.
pub struct ConcatenateProcessor {
    separator: String,
}

impl ConcatenateProcessor {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for ConcatenateProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

#[async_trait]
impl Processor for ConcatenateProcessor {
    fn name(&self) -> &str {
        "concatenate"
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![
            Property::new::<String>("first"),
            Property::optional::<String>("second"),
        ]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("combined")]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let first = input.require::<String>("first")?;
        let combined = match input.get::<String>("second") {
            Ok(Some(second)) => format!("{}{}{}", first, self.separator, second),
            Ok(None) | Err(ValuesError::NotSet(_)) => first.to_string(),
            Err(other) => return Err(other.into()),
        };
        Ok(Output::new().with("combined", combined))
    }
}
