//! Name lookup over discovered mods, and per-mod asset loaders.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    descriptor::DiscoveryCollection,
    error::{Error, Result},
};

/// Mod name -> mod directory, first discovered directory wins.
#[derive(Debug, Clone, Default)]
pub struct ModIndex {
    paths: HashMap<String, PathBuf>,
    asset_root: PathBuf,
}

impl ModIndex {
    pub fn build(collection: &DiscoveryCollection, asset_root: impl Into<PathBuf>) -> Self {
        let mut paths = HashMap::with_capacity(collection.len());
        for descriptor in collection {
            paths
                .entry(descriptor.name().to_string())
                .or_insert_with(|| descriptor.path().to_path_buf());
        }
        Self {
            paths,
            asset_root: asset_root.into(),
        }
    }

    pub fn is_mod_active(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    pub fn mod_path(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn asset_loader(&self, name: &str) -> Result<AssetLoader> {
        let base = self.mod_path(name).ok_or_else(|| Error::unknown_mod(name))?;
        Ok(AssetLoader::new(base, &self.asset_root))
    }
}

/// Maps asset paths inside a mod directory to paths relative to the host's
/// asset root, split into components.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
    asset_root: PathBuf,
}

impl AssetLoader {
    pub fn new(base_path: impl Into<PathBuf>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            asset_root: asset_root.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `components` joined under the mod directory, expressed relative to the
    /// asset root.
    pub fn get_asset<S: AsRef<str>>(&self, components: &[S]) -> Result<Vec<String>> {
        if components.is_empty() {
            return Err(Error::message("asset path needs at least one component"));
        }

        let mut desired = std::path::absolute(&self.base_path)?;
        for component in components {
            let component: &str = component.as_ref();
            desired.push(component);
        }
        let root = std::path::absolute(&self.asset_root)?;

        let relative = pathdiff::diff_paths(&desired, &root).ok_or_else(|| {
            Error::message(format!(
                "{} cannot be expressed relative to {}",
                desired.display(),
                root.display()
            ))
        })?;

        Ok(relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::descriptor::ModDescriptor};

    #[test]
    fn first_directory_wins_for_a_name() {
        let collection: DiscoveryCollection = [
            ModDescriptor::new("fireball", "mods/fireball"),
            ModDescriptor::new("fireball", "packs/packA/mods/fireball"),
        ]
        .into_iter()
        .collect();
        let index = ModIndex::build(&collection, "assets");

        assert!(index.is_mod_active("fireball"));
        assert!(!index.is_mod_active("icebolt"));
        assert_eq!(index.mod_path("fireball"), Some(Path::new("mods/fireball")));
    }

    #[test]
    fn unknown_mod_has_no_asset_loader() {
        let index = ModIndex::build(&DiscoveryCollection::new(), "assets");
        assert!(matches!(
            index.asset_loader("ghost"),
            Err(Error::UnknownMod { ref name }) if name == "ghost"
        ));
    }

    #[test]
    fn asset_paths_are_relative_to_asset_root() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(tmp.path().join("mods/fireball"), tmp.path().join("assets"));
        let parts = loader.get_asset(&["sprites", "fire.png"]).unwrap();
        assert_eq!(parts, ["..", "mods", "fireball", "sprites", "fire.png"]);
    }

    #[test]
    fn asset_inside_asset_root_has_no_parent_hops() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(tmp.path().join("assets/mods/x"), tmp.path().join("assets"));
        let parts = loader.get_asset(&["tiles.png"]).unwrap();
        assert_eq!(parts, ["mods", "x", "tiles.png"]);
    }

    #[test]
    fn empty_asset_path_is_rejected() {
        let loader = AssetLoader::new("mods/x", "assets");
        let empty: [&str; 0] = [];
        assert!(loader.get_asset(&empty).is_err());
    }
}
