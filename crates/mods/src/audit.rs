//! Duplicate module path detection.
//!
//! Duplicates are reported, not rejected. Only the first mod discovered for a
//! module path gets imported; the orchestrator skips the rest because the
//! path is already in the module registry by the time they come up.

use std::collections::HashMap;

use {serde::Serialize, tracing::warn};

use crate::descriptor::{DiscoveryCollection, ModDescriptor};

/// Mods sharing one module path, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub module_path: String,
    pub mods: Vec<ModDescriptor>,
}

impl DuplicateGroup {
    /// Number of mods claiming the module path.
    pub fn count(&self) -> usize {
        self.mods.len()
    }

    /// The mod that will actually be imported.
    pub fn winner(&self) -> Option<&ModDescriptor> {
        self.mods.first()
    }
}

/// Group `collection` by module path and warn about every group with more
/// than one member. Groups are returned in order of first appearance.
pub fn audit(collection: &DiscoveryCollection) -> Vec<DuplicateGroup> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ModDescriptor>> = HashMap::new();

    for descriptor in collection {
        groups
            .entry(descriptor.module_path())
            .or_insert_with(|| {
                order.push(descriptor.module_path());
                Vec::new()
            })
            .push(descriptor);
    }

    let duplicates: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|path| {
            let members = groups.remove(path)?;
            (members.len() > 1).then(|| DuplicateGroup {
                module_path: path.to_string(),
                mods: members.into_iter().cloned().collect(),
            })
        })
        .collect();

    for group in &duplicates {
        warn!(
            module_path = %group.module_path,
            duplicates = group.count(),
            "found duplicate module path, only the first will be loaded"
        );
    }

    duplicates
}
