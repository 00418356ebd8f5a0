// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configurable test processors used by graph and executor tests.

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::graph::{ProcessorDefinition, Property};
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output, Value};

/// Records the order in which processors executed across a run
#[derive(Debug, Clone, Default)]
pub struct ExecutionTracker(Arc<Mutex<Vec<String>>>);

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn order(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|n| *n == name).count()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|n| n == name)
    }
}

enum Produce {
    Fixed(Value),
    Forward(String),
    CountValues,
    Null,
    Omit,
}

/// A processor whose shape and behavior are assembled by the test
pub struct FixtureProcessor {
    name: String,
    inputs: Vec<Property>,
    outputs: Vec<(Property, Produce)>,
    tracker: Option<ExecutionTracker>,
    delay: Option<Duration>,
    stubborn: bool,
    failure: Option<String>,
    panics: bool,
    validation: Vec<String>,
}

impl FixtureProcessor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            tracker: None,
            delay: None,
            stubborn: false,
            failure: None,
            panics: false,
            validation: Vec::new(),
        }
    }

    pub fn requires<T: Any + Send + Sync>(mut self, name: &str) -> Self {
        self.inputs.push(Property::new::<T>(name));
        self
    }

    pub fn accepts(mut self, property: Property) -> Self {
        self.inputs.push(property);
        self
    }

    /// Declare an output filled with `T::default()`
    pub fn produces<T: Any + Send + Sync + Default>(self, name: &str) -> Self {
        self.produces_value(name, T::default())
    }

    pub fn produces_value<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.outputs
            .push((Property::new::<T>(name), Produce::Fixed(Value::new(value))));
        self
    }

    pub fn produces_debug<T: Any + Send + Sync + Default>(mut self, name: &str) -> Self {
        self.outputs.push((
            Property::new::<T>(name).debug(),
            Produce::Fixed(Value::new(T::default())),
        ));
        self
    }

    /// Declare an output that is returned as an explicit null
    pub fn produces_null<T: Any + Send + Sync>(mut self, name: &str) -> Self {
        self.outputs.push((Property::new::<T>(name), Produce::Null));
        self
    }

    /// Declare an output that copies a (previously declared) input
    pub fn forwards<T: Any + Send + Sync>(mut self, input: &str, output: &str) -> Self {
        self.outputs
            .push((Property::new::<T>(output), Produce::Forward(input.to_string())));
        self
    }

    /// Declare a `usize` output holding the number of entries in the values passthrough
    pub fn counts_values(mut self, output: &str) -> Self {
        self.outputs
            .push((Property::new::<usize>(output), Produce::CountValues));
        self
    }

    /// Declare an output but never return it
    pub fn omits(mut self, property: Property) -> Self {
        self.outputs.push((property, Produce::Omit));
        self
    }

    /// Declare an output of type `T` but return a value of type `U`
    pub fn mistypes<T: Any + Send + Sync, U: Any + Send + Sync>(mut self, name: &str, value: U) -> Self {
        self.outputs
            .push((Property::new::<T>(name), Produce::Fixed(Value::new(value))));
        self
    }

    pub fn tracked(mut self, tracker: &ExecutionTracker) -> Self {
        self.tracker = Some(tracker.clone());
        self
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    /// Sleep through the delay even after the run is cancelled
    pub fn ignoring_cancellation(mut self) -> Self {
        self.stubborn = true;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn invalid(mut self, message: &str) -> Self {
        self.validation.push(message.to_string());
        self
    }

    pub fn define(self) -> ProcessorDefinition {
        ProcessorDefinition::new(Arc::new(self))
    }
}

#[async_trait]
impl Processor for FixtureProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_properties(&self) -> Vec<Property> {
        self.inputs.clone()
    }

    fn output_properties(&self) -> Vec<Property> {
        self.outputs.iter().map(|(p, _)| p.clone()).collect()
    }

    async fn execute(&self, input: Input, ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        if let Some(delay) = self.delay.filter(|_| self.stubborn) {
            tokio::time::sleep(delay).await;
        } else if let Some(delay) = self.delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = ctx.cancelled() => return Err(ProcessorError::Cancelled),
            }
        }

        if let Some(tracker) = &self.tracker {
            tracker.record(&self.name);
        }

        if self.panics {
            panic!("{} blew up", self.name);
        }

        if let Some(message) = &self.failure {
            return Err(ProcessorError::failed(message.clone()));
        }

        let mut output = Output::new();
        for (property, produce) in &self.outputs {
            let name = property.name();
            match produce {
                Produce::Fixed(value) => output.insert_value(name, value.clone()),
                Produce::Forward(from) => match input.lookup(from) {
                    crate::values::Lookup::Present(value) => output.insert_value(name, value),
                    _ => output.put_null(name),
                },
                Produce::CountValues => {
                    let count = input.values().map(|v| v.len()).unwrap_or_default();
                    output.put(name, count);
                }
                Produce::Null => output.put_null(name),
                Produce::Omit => {}
            }
        }
        Ok(output)
    }

    fn validate(&self) -> Vec<String> {
        self.validation.clone()
    }
}
