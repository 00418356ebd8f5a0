// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::errors::NameMappingError;

/// Bidirectional alias table between a processor's local property names and the
/// global names of the values store.
///
/// The mapping is a partial bijection: names without an entry keep their local name.
/// It is built once from configuration and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    to_global: HashMap<String, String>,
    to_local: HashMap<String, String>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(local, global)` pairs, rejecting anything that is not
    /// one-to-one
    pub fn from_pairs<I, L, G>(pairs: I) -> Result<Self, NameMappingError>
    where
        I: IntoIterator<Item = (L, G)>,
        L: Into<String>,
        G: Into<String>,
    {
        let mut mapping = Self::new();
        for (local, global) in pairs {
            mapping.insert(local, global)?;
        }
        Ok(mapping)
    }

    pub fn insert(
        &mut self,
        local: impl Into<String>,
        global: impl Into<String>,
    ) -> Result<(), NameMappingError> {
        let local = local.into();
        let global = global.into();

        if let Some(existing) = self.to_global.get(&local) {
            return Err(NameMappingError::DuplicateLocal {
                local,
                existing: existing.clone(),
                global,
            });
        }
        if let Some(existing) = self.to_local.get(&global) {
            return Err(NameMappingError::DuplicateGlobal {
                global,
                existing: existing.clone(),
                local,
            });
        }

        self.to_local.insert(global.clone(), local.clone());
        self.to_global.insert(local, global);
        Ok(())
    }

    pub fn to_global(&self, local: &str) -> Option<&str> {
        self.to_global.get(local).map(String::as_str)
    }

    pub fn to_local(&self, global: &str) -> Option<&str> {
        self.to_local.get(global).map(String::as_str)
    }

    /// Local names that have an explicit entry
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.to_global.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.to_global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_global.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_both_directions() {
        let mapping = NameMapping::from_pairs([("map", "map2"), ("table", "overviewTable")]).unwrap();

        assert_eq!(mapping.to_global("map"), Some("map2"));
        assert_eq!(mapping.to_local("overviewTable"), Some("table"));
        assert_eq!(mapping.to_global("legend"), None);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn rejects_non_bijective_pairs() {
        let err = NameMapping::from_pairs([("map", "a"), ("map", "b")]).unwrap_err();
        assert!(matches!(err, NameMappingError::DuplicateLocal { ref local, .. } if local == "map"));

        let err = NameMapping::from_pairs([("a", "map"), ("b", "map")]).unwrap_err();
        assert!(matches!(err, NameMappingError::DuplicateGlobal { ref global, .. } if global == "map"));
    }
}
