// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

/// Configuration for the Prefix/Suffix Adder processor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrefixSuffixConfig {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// Prefix/Suffix Adder processor - reads `text`, writes `decorated`
pub struct PrefixSuffixAdderProcessor {
    config: PrefixSuffixConfig,
}

impl PrefixSuffixAdderProcessor {
    pub fn new(config: PrefixSuffixConfig) -> Self {
        Self { config }
    }

    pub fn with_prefix_and_suffix(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::new(PrefixSuffixConfig {
            prefix: Some(prefix.into()),
            suffix: Some(suffix.into()),
        })
    }

    pub fn decorate(&self, text: &str) -> String {
        format!(
            "{}{}{}",
            self.config.prefix.as_deref().unwrap_or_default(),
            text,
            self.config.suffix.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait]
impl Processor for PrefixSuffixAdderProcessor {
    fn name(&self) -> &str {
        "prefix_suffix_adder"
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("text")]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("decorated")]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let text = input.require::<String>("text")?;
        Ok(Output::new().with("decorated", self.decorate(&text)))
    }

    fn validate(&self) -> Vec<String> {
        let empty = |s: &Option<String>| s.as_deref().map_or(true, str::is_empty);
        if empty(&self.config.prefix) && empty(&self.config.suffix) {
            vec!["neither 'prefix' nor 'suffix' is set".to_string()]
        } else {
            Vec::new()
        }
    }
}
