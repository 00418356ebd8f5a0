// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

/// Token Counter processor - counts characters, words and lines of `text`
#[derive(Default)]
pub struct TokenCounterProcessor;

impl TokenCounterProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Processor for TokenCounterProcessor {
    fn name(&self) -> &str {
        "token_counter"
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("text")]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![
            Property::new::<i64>("char_count"),
            Property::new::<i64>("word_count"),
            Property::new::<i64>("line_count"),
        ]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let text = input.require::<String>("text")?;

        let char_count = text.chars().count() as i64;
        let word_count = text.split_whitespace().count() as i64;
        // at least one line, even when empty
        let line_count = text.lines().count().max(1) as i64;

        Ok(Output::new()
            .with("char_count", char_count)
            .with("word_count", word_count)
            .with("line_count", line_count))
    }
}
