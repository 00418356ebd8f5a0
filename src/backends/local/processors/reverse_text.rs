// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

/// Reverse Text processor - reads `text`, writes `reversed`
#[derive(Default)]
pub struct ReverseTextProcessor;

impl ReverseTextProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Processor for ReverseTextProcessor {
    fn name(&self) -> &str {
        "reverse_text"
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("text")]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("reversed")]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let text = input.require::<String>("text")?;
        let reversed: String = text.chars().rev().collect();
        Ok(Output::new().with("reversed", reversed))
    }
}
