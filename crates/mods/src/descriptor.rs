use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// Package every mod module path lives under.
pub const MODS_PACKAGE: &str = "mods";

/// Module path a mod named `name` is imported under: `mods.<name>.<name>`.
#[must_use]
pub fn module_path_for(name: &str) -> String {
    format!("{MODS_PACKAGE}.{name}.{name}")
}

/// A discovered mod. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModDescriptor {
    name: String,
    path: PathBuf,
    module_path: String,
}

impl ModDescriptor {
    /// Describe the mod directory `path`, whose basename is `name`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let module_path = module_path_for(&name);
        Self {
            name,
            path: path.into(),
            module_path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Entry file for the given extension: `<path>/<name>.<ext>`.
    #[must_use]
    pub fn entry_file(&self, extension: &str) -> PathBuf {
        self.path.join(format!("{}.{extension}", self.name))
    }
}

impl fmt::Display for ModDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Mods in discovery order.
///
/// Base mods come first, then sideloaded mods package by package. The order
/// decides import order and which of several mods sharing a module path wins.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiscoveryCollection {
    mods: Vec<ModDescriptor>,
}

impl DiscoveryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: ModDescriptor) {
        self.mods.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModDescriptor> {
        self.mods.iter()
    }

    pub fn as_slice(&self) -> &[ModDescriptor] {
        &self.mods
    }
}

impl Extend<ModDescriptor> for DiscoveryCollection {
    fn extend<I: IntoIterator<Item = ModDescriptor>>(&mut self, iter: I) {
        self.mods.extend(iter);
    }
}

impl FromIterator<ModDescriptor> for DiscoveryCollection {
    fn from_iter<I: IntoIterator<Item = ModDescriptor>>(iter: I) -> Self {
        Self {
            mods: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DiscoveryCollection {
    type IntoIter = std::slice::Iter<'a, ModDescriptor>;
    type Item = &'a ModDescriptor;

    fn into_iter(self) -> Self::IntoIter {
        self.mods.iter()
    }
}
