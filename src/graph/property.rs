// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;

use crate::values::{TypeTag, Value, Values};

/// Whether a property must be present when a processor runs
#[derive(Debug, Clone)]
pub enum Presence {
    Required,
    /// May be absent; the processor sees it as missing
    Optional,
    /// May be absent; the processor sees this value instead
    Default(Value),
}

/// Static descriptor of one input or output of a processor.
///
/// Names are local to the processor; the graph builder resolves them to global
/// names through the processor's name mapping and prefixes.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    type_tag: TypeTag,
    presence: Presence,
    debug: bool,
}

impl Property {
    /// A required property of type `T`
    pub fn new<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: TypeTag::of::<T>(),
            presence: Presence::Required,
            debug: false,
        }
    }

    pub fn optional<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::new::<T>(name)
        }
    }

    pub fn with_default<T: Any + Send + Sync>(name: impl Into<String>, default: T) -> Self {
        Self {
            presence: Presence::Default(Value::new(default)),
            ..Self::new::<T>(name)
        }
    }

    /// An input that receives the whole values store instead of a single entry
    pub fn values(name: impl Into<String>) -> Self {
        Self::new::<Values>(name)
    }

    /// Mark an output as debug output: several processors may produce it and no
    /// dependency is inferred from it
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_values_passthrough(&self) -> bool {
        self.type_tag.is::<Values>()
    }
}
