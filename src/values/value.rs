// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::ValuesError;

/// Runtime type identity of a property or stored value.
///
/// Two tags are equal when they describe the same Rust type; the name is kept only
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased, cheaply cloneable value held in the store.
#[derive(Clone)]
pub struct Value {
    tag: TypeTag,
    data: Arc<dyn Any + Send + Sync>,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            data: Arc::new(value),
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.data.clone().downcast::<T>().ok()
    }

    pub(crate) fn downcast_named<T: Any + Send + Sync>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, ValuesError> {
        self.downcast::<T>().ok_or_else(|| ValuesError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            actual: self.tag.name(),
        })
    }

    /// Render the value as JSON when its type is one of the plain scalar or JSON types.
    ///
    /// Anything else is rendered as `"<type name>"`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        let data = self.data.as_ref();
        if let Some(v) = data.downcast_ref::<String>() {
            Json::from(v.clone())
        } else if let Some(v) = data.downcast_ref::<&'static str>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<bool>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<i64>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<i32>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<u64>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<u32>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<usize>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<f64>() {
            Json::from(*v)
        } else if let Some(v) = data.downcast_ref::<Json>() {
            v.clone()
        } else {
            Json::from(format!("<{}>", self.tag.name()))
        }
    }

    /// Convert a JSON request parameter into a store value.
    ///
    /// Scalars become their natural Rust type so processors can declare `String`,
    /// `i64`, `f64` or `bool` inputs; arrays and objects stay `serde_json::Value`.
    pub fn from_json(json: serde_json::Value) -> Slot {
        use serde_json::Value as Json;

        match json {
            Json::Null => Slot::Null,
            Json::Bool(b) => Slot::Value(Value::new(b)),
            Json::String(s) => Slot::Value(Value::new(s)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Slot::Value(Value::new(i)),
                None => Slot::Value(Value::new(n.as_f64().unwrap_or(f64::NAN))),
            },
            other => Slot::Value(Value::new(other)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.tag.name())
    }
}

/// A written store entry: either an explicit null or a value
#[derive(Debug, Clone)]
pub enum Slot {
    Null,
    Value(Value),
}

impl Slot {
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Slot::Null => None,
            Slot::Value(v) => Some(v.tag()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Slot::Null => serde_json::Value::Null,
            Slot::Value(v) => v.to_json(),
        }
    }
}

/// Result of looking a name up without committing to a type.
///
/// Keeps "never written" apart from "written as null", which some attributes
/// legitimately are.
#[derive(Debug, Clone)]
pub enum Lookup {
    Missing,
    Null,
    Present(Value),
}

impl Lookup {
    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }
}

impl From<Option<Slot>> for Lookup {
    fn from(slot: Option<Slot>) -> Self {
        match slot {
            None => Lookup::Missing,
            Some(Slot::Null) => Lookup::Null,
            Some(Slot::Value(v)) => Lookup::Present(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_compare_by_type() {
        assert_eq!(TypeTag::of::<String>(), TypeTag::of::<String>());
        assert_ne!(TypeTag::of::<String>(), TypeTag::of::<i64>());
        assert!(TypeTag::of::<u32>().is::<u32>());
        assert_eq!(TypeTag::of::<String>().name(), "alloc::string::String");
    }

    #[test]
    fn downcast_checks_type() {
        let value = Value::new(42_i64);
        assert_eq!(*value.downcast::<i64>().unwrap(), 42);
        assert!(value.downcast::<String>().is_none());

        let err = value.downcast_named::<String>("answer").unwrap_err();
        assert!(matches!(err, ValuesError::TypeMismatch { ref name, .. } if name == "answer"));
    }

    #[test]
    fn json_scalars_become_native_types() {
        let slot = Value::from_json(serde_json::json!("hello"));
        assert_eq!(slot.tag(), Some(TypeTag::of::<String>()));

        let slot = Value::from_json(serde_json::json!(7));
        assert_eq!(slot.tag(), Some(TypeTag::of::<i64>()));

        let slot = Value::from_json(serde_json::json!(1.5));
        assert_eq!(slot.tag(), Some(TypeTag::of::<f64>()));

        let slot = Value::from_json(serde_json::json!({"a": 1}));
        assert_eq!(slot.tag(), Some(TypeTag::of::<serde_json::Value>()));

        assert!(matches!(Value::from_json(serde_json::Value::Null), Slot::Null));
    }

    #[test]
    fn unknown_types_render_as_type_name() {
        struct Opaque;
        let value = Value::new(Opaque);
        let rendered = value.to_json();
        assert!(rendered.as_str().unwrap().contains("Opaque"));
        assert_eq!(Value::new(3_usize).to_json(), serde_json::json!(3));
    }
}
