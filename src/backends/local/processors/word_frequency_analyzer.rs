// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

/// Word Frequency Analyzer processor.
///
/// Reads `text` and writes `word_frequencies`, a JSON object of normalized word to
/// occurrence count, plus `unique_words`. Words are lowercased and stripped of
/// anything that is not alphanumeric.
#[derive(Default)]
pub struct WordFrequencyAnalyzerProcessor;

impl WordFrequencyAnalyzerProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(text: &str) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for word in text.split_whitespace() {
            let normalized: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();

            if !normalized.is_empty() {
                *counts.entry(normalized).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[async_trait]
impl Processor for WordFrequencyAnalyzerProcessor {
    fn name(&self) -> &str {
        "word_frequency_analyzer"
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("text")]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![
            Property::new::<serde_json::Value>("word_frequencies"),
            Property::new::<i64>("unique_words"),
        ]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let text = input.require::<String>("text")?;
        let counts = Self::analyze(&text);
        let unique_words = counts.len() as i64;
        let frequencies = serde_json::to_value(counts).map_err(anyhow::Error::from)?;

        Ok(Output::new()
            .with("word_frequencies", frequencies)
            .with("unique_words", unique_words))
    }
}
