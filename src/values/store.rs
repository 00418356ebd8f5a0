// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::ValuesError;
use crate::values::{Lookup, Slot, Value};

/// Where an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Supplied by the caller before the run started
    External,
    /// Written by a processor during the run
    Produced,
}

/// How a processor output may be written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// The name must not exist yet
    Once,
    /// The name may exist only as an external value, which is replaced
    OverrideExternal,
    /// Debug output: any previous value is replaced
    Replace,
}

#[derive(Debug, Clone)]
struct Entry {
    slot: Slot,
    origin: Origin,
}

/// The shared, run-scoped blackboard every processor reads from and writes to.
///
/// Cloning a `Values` yields another handle to the same store. Each global name is
/// written once per run; readers of a name only run after its writer joined, so a
/// single store-wide lock is enough.
#[derive(Clone, Default)]
pub struct Values {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a JSON object of request parameters, all marked external.
    pub fn from_json(object: serde_json::Map<String, serde_json::Value>) -> Self {
        let entries = object
            .into_iter()
            .map(|(name, json)| {
                (
                    name,
                    Entry {
                        slot: Value::from_json(json),
                        origin: Origin::External,
                    },
                )
            })
            .collect();

        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Store an externally supplied value
    pub fn put<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) -> Result<(), ValuesError> {
        self.insert(name.into(), Slot::Value(Value::new(value)), Origin::External, WritePolicy::Once)
    }

    /// Store an externally supplied explicit null
    pub fn put_null(&self, name: impl Into<String>) -> Result<(), ValuesError> {
        self.insert(name.into(), Slot::Null, Origin::External, WritePolicy::Once)
    }

    /// Write a processor output under its global name
    pub(crate) fn publish(&self, name: &str, slot: Slot, policy: WritePolicy) -> Result<(), ValuesError> {
        self.publish_all(vec![(name, slot, policy)])
    }

    /// Write all outputs of one processor, or none of them.
    ///
    /// Every name is checked against its policy under a single write lock before
    /// anything is inserted.
    pub(crate) fn publish_all(&self, writes: Vec<(&str, Slot, WritePolicy)>) -> Result<(), ValuesError> {
        let mut entries = self.write();
        let mut batch = HashSet::new();
        for (name, _, policy) in &writes {
            let clashes_in_batch = !batch.insert(*name) && *policy != WritePolicy::Replace;
            let clashes_in_store = entries.get(*name).is_some_and(|existing| !permits(existing, *policy));
            if clashes_in_batch || clashes_in_store {
                return Err(ValuesError::DuplicateWrite(name.to_string()));
            }
        }

        for (name, slot, _) in writes {
            entries.insert(
                name.to_string(),
                Entry {
                    slot,
                    origin: Origin::Produced,
                },
            );
        }
        Ok(())
    }

    fn insert(&self, name: String, slot: Slot, origin: Origin, policy: WritePolicy) -> Result<(), ValuesError> {
        let mut entries = self.write();
        if let Some(existing) = entries.get(&name) {
            if !permits(existing, policy) {
                return Err(ValuesError::DuplicateWrite(name));
            }
        }
        entries.insert(name, Entry { slot, origin });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Lookup {
        self.read().get(name).map(|e| e.slot.clone()).into()
    }

    /// Typed read.
    ///
    /// `Err(NotSet)` when the name was never written, `Ok(None)` when it was written
    /// as null.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>, ValuesError> {
        match self.lookup(name) {
            Lookup::Missing => Err(ValuesError::NotSet(name.to_string())),
            Lookup::Null => Ok(None),
            Lookup::Present(value) => value.downcast_named::<T>(name).map(Some),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.read().get(name).map(|e| e.origin)
    }

    /// All names currently stored, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Render the whole store as a JSON object for diagnostics
    pub fn to_json(&self) -> serde_json::Value {
        let entries = self.read();
        let object: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.slot.to_json()))
            .collect();
        serde_json::Value::Object(object)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn permits(existing: &Entry, policy: WritePolicy) -> bool {
    match policy {
        WritePolicy::Once => false,
        WritePolicy::OverrideExternal => existing.origin == Origin::External,
        WritePolicy::Replace => true,
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.read();
        let mut names: Vec<(&String, &Slot)> = entries.iter().map(|(k, e)| (k, &e.slot)).collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_unset_from_null() {
        let values = Values::new();
        values.put_null("legend").unwrap();

        assert!(matches!(values.get::<String>("legend"), Ok(None)));
        assert!(matches!(
            values.get::<String>("title"),
            Err(ValuesError::NotSet(ref name)) if name == "title"
        ));
        assert!(matches!(values.lookup("legend"), Lookup::Null));
        assert!(values.lookup("title").is_missing());
    }

    #[test]
    fn typed_get_rejects_wrong_type() {
        let values = Values::new();
        values.put("dpi", 300_i64).unwrap();

        assert_eq!(*values.get::<i64>("dpi").unwrap().unwrap(), 300);
        assert!(matches!(
            values.get::<String>("dpi"),
            Err(ValuesError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn write_policies() {
        let values = Values::new();
        values.put("layout", "A4".to_string()).unwrap();

        // external values are write-once for callers too
        assert_eq!(
            values.put("layout", "A3".to_string()),
            Err(ValuesError::DuplicateWrite("layout".to_string()))
        );

        // a flagged override may replace an external value exactly once
        values
            .publish("layout", Slot::Value(Value::new("A3".to_string())), WritePolicy::OverrideExternal)
            .unwrap();
        assert_eq!(values.origin("layout"), Some(Origin::Produced));
        assert!(values
            .publish("layout", Slot::Null, WritePolicy::OverrideExternal)
            .is_err());

        values.publish("map", Slot::Null, WritePolicy::Once).unwrap();
        assert!(values.publish("map", Slot::Null, WritePolicy::Once).is_err());

        values.publish("debug", Slot::Null, WritePolicy::Replace).unwrap();
        values
            .publish("debug", Slot::Value(Value::new(1_i64)), WritePolicy::Replace)
            .unwrap();
        assert_eq!(*values.get::<i64>("debug").unwrap().unwrap(), 1);
    }

    #[test]
    fn publish_all_writes_nothing_on_conflict() {
        let values = Values::new();
        values.put("b", "seeded".to_string()).unwrap();

        let result = values.publish_all(vec![
            ("a", Slot::Value(Value::new("A".to_string())), WritePolicy::Once),
            ("b", Slot::Value(Value::new("B".to_string())), WritePolicy::Once),
        ]);

        assert_eq!(result, Err(ValuesError::DuplicateWrite("b".to_string())));
        assert!(!values.contains("a"));
        assert_eq!(*values.get::<String>("b").unwrap().unwrap(), "seeded");
        assert_eq!(values.origin("b"), Some(Origin::External));

        values
            .publish_all(vec![
                ("a", Slot::Value(Value::new("A".to_string())), WritePolicy::Once),
                ("c", Slot::Null, WritePolicy::Once),
            ])
            .unwrap();
        assert_eq!(values.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn clones_share_the_store() {
        let values = Values::new();
        let handle = values.clone();
        handle.put("scale", 25_000_i64).unwrap();

        assert!(values.contains("scale"));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn json_round_trip_for_diagnostics() {
        let params = serde_json::json!({
            "title": "Overview",
            "dpi": 150,
            "legend": null,
            "layers": ["roads", "rivers"],
        });
        let serde_json::Value::Object(object) = params.clone() else {
            panic!("expected object");
        };

        let values = Values::from_json(object);
        assert_eq!(values.origin("title"), Some(Origin::External));
        assert_eq!(values.keys(), vec!["dpi", "layers", "legend", "title"]);
        assert_eq!(values.to_json(), params);
    }
}
