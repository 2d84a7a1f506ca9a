use std::sync::Arc;

use crate::{
    descriptor::ModDescriptor,
    error::{Error, Result},
    host::HostModule,
    index::{AssetLoader, ModIndex},
    registry::ModuleRegistry,
    search_path::ModuleSearchPath,
    shim::{ImportResolver, Module},
};

/// Everything a mod entry point may touch while it runs.
///
/// Mods get the host through [`host`](Self::host) or by importing its reserved
/// name; both hand back the same running instance.
#[derive(Debug, Clone, Copy)]
pub struct ModContext<'a> {
    descriptor: &'a ModDescriptor,
    host: &'a Arc<HostModule>,
    resolver: &'a ImportResolver,
    registry: &'a ModuleRegistry,
    index: &'a ModIndex,
    search_path: &'a ModuleSearchPath,
}

impl<'a> ModContext<'a> {
    pub fn new(
        descriptor: &'a ModDescriptor,
        host: &'a Arc<HostModule>,
        resolver: &'a ImportResolver,
        registry: &'a ModuleRegistry,
        index: &'a ModIndex,
        search_path: &'a ModuleSearchPath,
    ) -> Self {
        Self {
            descriptor,
            host,
            resolver,
            registry,
            index,
            search_path,
        }
    }

    /// The mod being imported.
    pub fn descriptor(&self) -> &'a ModDescriptor {
        self.descriptor
    }

    pub fn host(&self) -> Arc<HostModule> {
        Arc::clone(self.host)
    }

    /// Resolve `name` through the installed finders, then among mods that
    /// have already been imported.
    pub fn import(&self, name: &str) -> Result<Module> {
        if let Some(module) = self.resolver.resolve(name)? {
            return Ok(module);
        }
        self.registry
            .get(name)
            .map(Module::Mod)
            .ok_or_else(|| Error::import_not_found(name))
    }

    pub fn search_path(&self) -> &'a ModuleSearchPath {
        self.search_path
    }

    pub fn is_mod_active(&self, name: &str) -> bool {
        self.index.is_mod_active(name)
    }

    pub fn asset_loader(&self, name: &str) -> Result<AssetLoader> {
        self.index.asset_loader(name)
    }
}
