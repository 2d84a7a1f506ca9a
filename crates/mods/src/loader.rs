//! Startup sequence tying discovery, auditing and importing together.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    modhost_config::ModsConfig,
    serde::Serialize,
    tracing::{info, warn},
};

use crate::{
    audit::{DuplicateGroup, audit},
    descriptor::DiscoveryCollection,
    error::{Error, Result},
    host::HostModule,
    index::ModIndex,
    loaded::LoadedMods,
    orchestrator::Orchestrator,
    registry::ModuleRegistry,
    runtime::ModRuntime,
    scanner::discover,
    search_path::ModuleSearchPath,
    shim::{HostShim, ImportResolver},
    sideload::{self, SideloadRequest},
};

/// Where to look for mods and how to recognise them.
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub mods_dir: PathBuf,
    pub entry_extension: String,
    pub sideload_flag: String,
    pub asset_root: PathBuf,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self::from(&ModsConfig::default())
    }
}

impl From<&ModsConfig> for LoaderSettings {
    fn from(config: &ModsConfig) -> Self {
        Self {
            mods_dir: config.dir.clone(),
            entry_extension: config.entry_extension.clone(),
            sideload_flag: config.sideload_flag.clone(),
            asset_root: config.asset_root.clone(),
        }
    }
}

/// Everything a bootstrap produced.
#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub collection: DiscoveryCollection,
    pub duplicates: Vec<DuplicateGroup>,
    pub loaded_mods: LoadedMods,
    pub sideload_root: Option<PathBuf>,
    #[serde(skip)]
    pub registry: ModuleRegistry,
    #[serde(skip)]
    pub index: ModIndex,
    #[serde(skip)]
    pub search_path: ModuleSearchPath,
}

/// Runs the one startup pass over the base mods directory and, when asked
/// for, a sideload root.
pub struct ModLoader {
    settings: LoaderSettings,
    host: Arc<HostModule>,
    runtime: Box<dyn ModRuntime>,
}

impl ModLoader {
    pub fn new(
        settings: LoaderSettings,
        host: Arc<HostModule>,
        runtime: impl ModRuntime + 'static,
    ) -> Self {
        Self {
            settings,
            host,
            runtime: Box::new(runtime),
        }
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    pub fn host(&self) -> &Arc<HostModule> {
        &self.host
    }

    /// Discover, audit and import all mods, then publish the loaded-mods
    /// record on the host.
    ///
    /// `args` are the process arguments; the sideload flag among them enables
    /// sideloading from the path that follows it. A flag without a path and
    /// any failing mod abort startup, as does a base mods directory that
    /// cannot be read.
    ///
    /// The host keeps the first loaded-mods record it is given. Bootstrapping
    /// the same host again still imports and reports, but the host's record
    /// stays as it was and a warning is logged.
    pub fn bootstrap<I, S>(&self, args: I) -> Result<LoadReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        info!("starting up modhost loader");

        let sideload = SideloadRequest::from_args(args, &self.settings.sideload_flag)?;

        let mut resolver = ImportResolver::new();
        resolver.install_front(HostShim::new(Arc::clone(&self.host)));

        let mut collection = DiscoveryCollection::new();
        let mut search_path = ModuleSearchPath::new();

        info!(dir = %self.settings.mods_dir.display(), "checking base mods directory");
        check_mods_dir(&self.settings.mods_dir)?;
        for descriptor in discover(&self.settings.mods_dir, &self.settings.entry_extension) {
            info!(name = descriptor.name(), path = %descriptor.path().display(), "found mod");
            collection.push(descriptor);
        }

        if let Some(request) = &sideload {
            info!(path = %request.root().display(), "found mod sideloading path");
            sideload::resolve(
                request.root(),
                &self.settings.entry_extension,
                &mut collection,
                &mut search_path,
            )?;
        }

        let duplicates = audit(&collection);
        let index = ModIndex::build(&collection, &self.settings.asset_root);

        let mut registry = ModuleRegistry::new();
        let loaded_mods = Orchestrator::new(
            &self.host,
            &resolver,
            &index,
            &search_path,
            self.runtime.as_ref(),
        )
        .run(&collection, &mut registry)?;

        if !self.host.publish_loaded_mods(loaded_mods.clone()) {
            warn!(
                host = self.host.name(),
                "host already carries a loaded-mods record, this run's record was not published"
            );
        }
        info!(
            discovered = collection.len(),
            imported = registry.len(),
            "modhost loader loaded"
        );

        Ok(LoadReport {
            collection,
            duplicates,
            loaded_mods,
            sideload_root: sideload.map(|r| r.root().to_path_buf()),
            registry,
            index,
            search_path,
        })
    }
}

/// The base mods directory must exist and be a directory; sideload packages
/// without one are skipped instead.
fn check_mods_dir(dir: &Path) -> Result<()> {
    let metadata = fs::metadata(dir).map_err(|e| Error::mods_dir(dir, e))?;
    if !metadata.is_dir() {
        return Err(Error::mods_dir(
            dir,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    Ok(())
}
