//! Config schema for the host and its mod loader.

use std::{collections::HashMap, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModhostConfig {
    pub host: HostConfig,
    pub mods: ModsConfig,
}

/// Identity of the host process as seen by mods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Reserved import name that resolves to the running host module.
    pub name: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "host".into(),
        }
    }
}

/// Where mods live and how their entry files are run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModsConfig {
    /// Base mods directory, scanned before any sideloaded packages.
    pub dir: PathBuf,
    /// Extension of a mod's entry file (`<name>/<name>.<ext>`), without the dot.
    pub entry_extension: String,
    /// Argument token that must be followed by a sideload root.
    pub sideload_flag: String,
    /// Root that asset loaders compute relative asset paths against.
    pub asset_root: PathBuf,
    /// Entry file extension -> interpreter program.
    pub interpreters: HashMap<String, String>,
}

impl Default for ModsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("mods"),
            entry_extension: "sh".into(),
            sideload_flag: "loadmods".into(),
            asset_root: PathBuf::from("assets"),
            interpreters: HashMap::from([("sh".to_string(), "sh".to_string())]),
        }
    }
}

impl ModsConfig {
    /// Interpreter configured for the entry file extension, if any.
    #[must_use]
    pub fn entry_interpreter(&self) -> Option<&str> {
        self.interpreters
            .get(&self.entry_extension)
            .map(String::as_str)
    }
}
