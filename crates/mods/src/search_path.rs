use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Directories mod code may resolve sibling files from.
///
/// Append-only: entries are added as sideloaded packages are found and are
/// never removed for the rest of the process.
#[derive(Debug, Clone, Default)]
pub struct ModuleSearchPath {
    dirs: Vec<PathBuf>,
}

impl ModuleSearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Join the entries with the platform path-list separator, for passing
    /// to child processes.
    pub fn to_env_value(&self) -> Result<OsString> {
        std::env::join_paths(&self.dirs)
            .map_err(|e| Error::message(format!("module search path not representable: {e}")))
    }
}
