//! Sideloading mods from an external root of packages.
//!
//! ```text
//! <root>/
//!   packA/
//!     mods/
//!       fireball/fireball.<ext>
//!   packB/
//!     mods/
//!       icebolt/icebolt.<ext>
//!   notes.txt          <- no mods/ folder, skipped
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    descriptor::DiscoveryCollection,
    error::{Error, Result},
    scanner::discover,
    search_path::ModuleSearchPath,
};

/// Folder inside a package that holds its mods.
pub const PACKAGE_MODS_DIR: &str = "mods";

/// A request to sideload mods, taken from the process arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideloadRequest {
    root: PathBuf,
}

impl SideloadRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Look for `flag` among `args`; the argument right after it is the root.
    ///
    /// Returns `Ok(None)` when the flag is absent. A flag with nothing after
    /// it is a configuration error.
    pub fn from_args<I, S>(args: I, flag: &str) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        if !args.by_ref().any(|arg| arg.as_ref() == flag) {
            return Ok(None);
        }
        match args.next() {
            Some(root) => Ok(Some(Self::new(root.as_ref()))),
            None => Err(Error::MissingSideloadPath {
                flag: flag.to_string(),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Discover mods in every package under `root`.
///
/// Packages are visited in directory-listing order. A package without a
/// `mods/` directory is logged and skipped. For every other package the
/// package directory is appended to `search_path` and its mods are appended to
/// `collection`. Returns the number of mods added.
pub fn resolve(
    root: &Path,
    extension: &str,
    collection: &mut DiscoveryCollection,
    search_path: &mut ModuleSearchPath,
) -> Result<usize> {
    let packages = std::fs::read_dir(root).map_err(|e| Error::sideload_root(root, e))?;
    let before = collection.len();

    for package in packages {
        let package = package.map_err(|e| Error::sideload_root(root, e))?;
        let package_dir = root.join(package.file_name());
        info!(package = %package.file_name().to_string_lossy(), "checking package for mods");

        let mods_dir = package_dir.join(PACKAGE_MODS_DIR);
        if !mods_dir.is_dir() {
            info!(path = %mods_dir.display(), "not a valid mods directory, skipping");
            continue;
        }

        search_path.append(&package_dir);

        for descriptor in discover(&mods_dir, extension) {
            info!(name = descriptor.name(), path = %descriptor.path().display(), "found mod");
            collection.push(descriptor);
        }
    }

    Ok(collection.len() - before)
}
