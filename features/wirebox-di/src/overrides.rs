//! Caller supplied parameter overrides
//!
//! Overrides are a flat map from parameter name to value. A dotted key addresses a
//! parameter of a nested dependency: `"child.local"` overrides `local` of whatever
//! gets injected as `child`. [explode] splits one level of that nesting, deeper levels
//! are split again when the nested map is handed to the next construction.

use std::collections::{btree_map, BTreeMap, HashMap};

use crate::types::{Injectable, Instance};

/// Flat parameter overrides for a single `make`, `resolve` or `call`
#[derive(Debug, Clone, Default)]
pub struct Parameters(BTreeMap<String, Instance>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an override, chainable
    pub fn with<T: Injectable>(self, key: impl Into<String>, value: T) -> Self {
        self.with_instance(key, Instance::new(value))
    }

    pub fn with_instance(mut self, key: impl Into<String>, value: impl Into<Instance>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Instance>) -> Option<Instance> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Instance> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Instance> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Instance)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, Instance)>>(iter: T) -> Self {
        Parameters(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a Instance);
    type IntoIter = btree_map::Iter<'a, String, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One top-level entry of an exploded override map
#[derive(Debug, Clone)]
pub enum Override {
    /// Value for the parameter itself
    Value(Instance),
    /// Overrides forwarded to the dependency injected as the parameter
    Nested(Parameters),
}

/// Overrides split at the first dot of every key
#[derive(Debug, Clone, Default)]
pub struct Exploded(HashMap<String, Override>);

impl Exploded {
    /// The direct override for a parameter
    pub fn direct(&self, name: &str) -> Option<&Instance> {
        match self.0.get(name) {
            Some(Override::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Overrides to forward to the dependency injected as `name` - empty if there are none
    pub fn nested(&self, name: &str) -> Parameters {
        match self.0.get(name) {
            Some(Override::Nested(nested)) => nested.clone(),
            _ => Parameters::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Override> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Splits every key at its first `.` into a top-level name and a nested key
///
/// A direct value and nested keys for the same name conflict, the direct value wins
/// regardless of the order keys were inserted in.
pub fn explode(flat: &Parameters) -> Exploded {
    let mut exploded: HashMap<String, Override> = HashMap::new();

    for (key, value) in flat {
        match key.split_once('.') {
            None => {
                exploded.insert(key.clone(), Override::Value(value.clone()));
            }
            Some((head, rest)) => match exploded
                .entry(head.to_string())
                .or_insert_with(|| Override::Nested(Parameters::new()))
            {
                Override::Nested(nested) => {
                    nested.insert(rest, value.clone());
                }
                Override::Value(_) => {
                    tracing::trace!("Ignoring override '{}' - '{}' has a direct value", key, head);
                }
            },
        }
    }

    Exploded(exploded)
}
