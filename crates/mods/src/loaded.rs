//! The record of which mods the loader went through.
//!
//! One name is recorded per import attempt, skipped imports included, so the
//! record always has as many entries as the discovery collection. Once frozen
//! it cannot be changed: [`LoadedMods`] has no mutating methods and copies
//! taken from it are detached.

use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Collects names while the orchestrator runs.
#[derive(Debug, Default)]
pub struct LoadedModsBuilder {
    names: Vec<String>,
}

impl LoadedModsBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn freeze(self) -> LoadedMods {
        LoadedMods {
            names: self.names.into(),
        }
    }
}

/// Read-only, cheaply cloneable list of attempted mod names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedMods {
    names: Arc<[String]>,
}

impl LoadedMods {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Detached copy; changing it never affects this list.
    pub fn to_vec(&self) -> Vec<String> {
        self.names.to_vec()
    }
}

impl Serialize for LoadedMods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn freeze_keeps_order_and_duplicates() {
        let mut b = LoadedModsBuilder::with_capacity(3);
        b.record("fireball");
        b.record("fireball");
        b.record("icebolt");
        let loaded = b.freeze();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), ["fireball", "fireball", "icebolt"]);
        assert_eq!(loaded.get(2), Some("icebolt"));
        assert_eq!(loaded.get(3), None);
        assert!(loaded.contains("fireball"));
    }

    #[test]
    fn pushing_onto_a_copy_does_not_change_the_list() {
        let mut b = LoadedModsBuilder::default();
        b.record("fireball");
        let loaded = b.freeze();
        let shared = loaded.clone();

        let mut copy = loaded.to_vec();
        copy.push("intruder".into());

        assert_eq!(loaded.len(), 1);
        assert_eq!(shared.len(), 1);
        assert!(!shared.contains("intruder"));
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut b = LoadedModsBuilder::default();
        b.record("a");
        b.record("b");
        assert_eq!(
            serde_json::to_value(b.freeze()).unwrap(),
            serde_json::json!(["a", "b"])
        );
    }
}
