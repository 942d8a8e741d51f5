use std::collections::BTreeMap;

use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// String-keyed store where writing an existing key replaces its value
/// wholesale.
#[derive(Debug, Clone, Deref, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repo<T>(BTreeMap<String, T>);

impl<T> Default for Repo<T> {
    fn default() -> Self {
        Repo(BTreeMap::new())
    }
}

impl<T> Repo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, returning the replaced value.
    pub fn upsert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.0.insert(key.into(), value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.0.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.0.remove(key)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.values_mut()
    }

    pub fn retain(&mut self, f: impl FnMut(&String, &mut T) -> bool) {
        self.0.retain(f)
    }

    pub fn entry_or_insert_with(&mut self, key: &str, f: impl FnOnce() -> T) -> &mut T {
        self.0.entry(key.to_string()).or_insert_with(f)
    }
}
