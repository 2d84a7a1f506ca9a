use std::sync::Arc;

use tracing::info;

use crate::{
    context::ModContext,
    descriptor::DiscoveryCollection,
    error::{Error, Result},
    host::HostModule,
    index::ModIndex,
    loaded::{LoadedMods, LoadedModsBuilder},
    registry::{LoadedModule, ModuleRegistry},
    runtime::ModRuntime,
    search_path::ModuleSearchPath,
    shim::ImportResolver,
};

/// Imports discovered mods, in order, at most once per module path.
pub struct Orchestrator<'a> {
    host: &'a Arc<HostModule>,
    resolver: &'a ImportResolver,
    index: &'a ModIndex,
    search_path: &'a ModuleSearchPath,
    runtime: &'a dyn ModRuntime,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        host: &'a Arc<HostModule>,
        resolver: &'a ImportResolver,
        index: &'a ModIndex,
        search_path: &'a ModuleSearchPath,
        runtime: &'a dyn ModRuntime,
    ) -> Self {
        Self {
            host,
            resolver,
            index,
            search_path,
            runtime,
        }
    }

    /// Import every mod in `collection` that `registry` does not already hold.
    ///
    /// Every mod is recorded in the returned list whether or not it was
    /// imported. The first entry point that fails aborts the run; mods after it
    /// are neither imported nor recorded.
    pub fn run(
        &self,
        collection: &DiscoveryCollection,
        registry: &mut ModuleRegistry,
    ) -> Result<LoadedMods> {
        let mut loaded = LoadedModsBuilder::with_capacity(collection.len());

        for descriptor in collection {
            info!(name = descriptor.name(), path = %descriptor.path().display(), "loading mod");
            loaded.record(descriptor.name());

            if registry.contains(descriptor.module_path()) {
                info!(module_path = descriptor.module_path(), "already loaded, skipping");
                continue;
            }

            let cx = ModContext::new(
                descriptor,
                self.host,
                self.resolver,
                registry,
                self.index,
                self.search_path,
            );
            let exports = self
                .runtime
                .execute(descriptor, &cx)
                .map_err(|e| Error::mod_execution(descriptor, e))?;

            registry.insert(LoadedModule::new(descriptor.clone(), exports));
        }

        Ok(loaded.freeze())
    }
}
