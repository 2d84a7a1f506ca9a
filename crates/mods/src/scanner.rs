//! Directory scanning.
//!
//! A mods root is scanned one level deep. A subdirectory is a mod when it
//! contains an entry file named after itself; anything else is skipped.

use std::{
    fs::ReadDir,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::descriptor::ModDescriptor;

/// Lazily scan `root` for mods whose entry file has `extension`.
///
/// Nothing is read until the iterator is advanced past the initial directory
/// open. An unreadable or missing root yields nothing. Order follows the
/// directory listing.
pub fn discover(root: impl AsRef<Path>, extension: &str) -> Discover {
    let root = root.as_ref().to_path_buf();
    let entries = match std::fs::read_dir(&root) {
        Ok(entries) => Some(entries),
        Err(e) => {
            debug!(root = %root.display(), %e, "mods directory not readable, nothing to discover");
            None
        },
    };
    Discover {
        root,
        extension: extension.to_string(),
        entries,
    }
}

/// Iterator returned by [`discover`].
#[derive(Debug)]
pub struct Discover {
    root: PathBuf,
    extension: String,
    entries: Option<ReadDir>,
}

impl Discover {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Discover {
    type Item = ModDescriptor;

    fn next(&mut self) -> Option<ModDescriptor> {
        let entries = self.entries.as_mut()?;

        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), %e, "failed to read mods directory entry");
                    continue;
                },
            };

            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                debug!(?dir, "skipping mod directory with non UTF-8 name");
                continue;
            };

            let entry_file = dir.join(format!("{name}.{}", self.extension));
            if !entry_file.is_file() {
                debug!(?dir, "no {name}.{} entry file, skipping", self.extension);
                continue;
            }

            return Some(ModDescriptor::new(name, dir));
        }

        self.entries = None;
        None
    }
}

/// A mods root that can be scanned repeatedly.
///
/// Every [`scan`](Self::scan) re-reads the filesystem; results are not cached.
#[derive(Debug, Clone)]
pub struct ModScanner {
    root: PathBuf,
    extension: String,
}

impl ModScanner {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scan(&self) -> Discover {
        discover(&self.root, &self.extension)
    }
}

impl IntoIterator for &ModScanner {
    type IntoIter = Discover;
    type Item = ModDescriptor;

    fn into_iter(self) -> Discover {
        self.scan()
    }
}
