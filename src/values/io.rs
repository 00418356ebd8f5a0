// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ValuesError;
use crate::values::{Lookup, Slot, Value, Values};

/// The values handed to one processor invocation, keyed by the processor's local
/// property names.
#[derive(Debug, Default)]
pub struct Input {
    entries: HashMap<String, Slot>,
    values: Option<Values>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, slot: Slot) {
        self.entries.insert(name.to_string(), slot);
    }

    pub(crate) fn attach_values(&mut self, values: Values) {
        self.values = Some(values);
    }

    pub fn lookup(&self, name: &str) -> Lookup {
        self.entries.get(name).cloned().into()
    }

    /// Typed read; `Ok(None)` for an explicit null
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>, ValuesError> {
        match self.lookup(name) {
            Lookup::Missing => Err(ValuesError::NotSet(name.to_string())),
            Lookup::Null => Ok(None),
            Lookup::Present(value) => value.downcast_named::<T>(name).map(Some),
        }
    }

    /// Typed read of a property that must hold a value
    pub fn require<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ValuesError> {
        self.get::<T>(name)?
            .ok_or_else(|| ValuesError::NotSet(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The run's whole store, present when the processor declared a values passthrough
    pub fn values(&self) -> Option<&Values> {
        self.values.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a processor returns, keyed by its local output property names.
#[derive(Debug, Default)]
pub struct Output {
    entries: HashMap<String, Slot>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.put(name, value);
        self
    }

    pub fn put<T: Any + Send + Sync>(&mut self, name: &str, value: T) {
        self.entries.insert(name.to_string(), Slot::Value(Value::new(value)));
    }

    pub fn put_null(&mut self, name: &str) {
        self.entries.insert(name.to_string(), Slot::Null);
    }

    /// Store an already type-erased value, e.g. one forwarded from the input
    pub fn insert_value(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), Slot::Value(value));
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<Slot> {
        self.entries.remove(name)
    }

    pub(crate) fn remaining(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_treats_null_as_unset() {
        let mut input = Input::new();
        input.insert("title", Slot::Null);
        input.insert("dpi", Slot::Value(Value::new(72_i64)));

        assert!(matches!(input.get::<String>("title"), Ok(None)));
        assert!(input.require::<String>("title").is_err());
        assert_eq!(*input.require::<i64>("dpi").unwrap(), 72);
        assert!(input.values().is_none());
    }

    #[test]
    fn output_builder_collects_entries() {
        let mut output = Output::new().with("map", "svg".to_string());
        output.put_null("legend");

        assert_eq!(output.len(), 2);
        assert!(matches!(output.take("legend"), Some(Slot::Null)));
        assert!(output.take("legend").is_none());
        assert_eq!(output.remaining().count(), 1);
    }
}
