//! The running host, as seen by the loader and by mods.
//!
//! The host constructs a [`HostModule`] and hands it to the loader. Nothing is
//! discovered by introspection: whoever owns the process decides what state
//! mods can see.

use std::{
    any::Any,
    fmt,
    sync::{Arc, OnceLock},
};

use tracing::debug;

use crate::loaded::LoadedMods;

/// Handle to the already-initialized host process.
pub struct HostModule {
    name: String,
    state: Arc<dyn Any + Send + Sync>,
    loaded_mods: OnceLock<LoadedMods>,
}

impl HostModule {
    /// `name` is the reserved import name mods use to reach the host.
    pub fn new(name: impl Into<String>, state: impl Any + Send + Sync) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(state),
            loaded_mods: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed access to the host state.
    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.downcast_ref::<T>()
    }

    /// Publish the loaded-mods record. Only the first call has any effect;
    /// later calls are ignored and return `false`.
    pub fn publish_loaded_mods(&self, mods: LoadedMods) -> bool {
        match self.loaded_mods.set(mods) {
            Ok(()) => true,
            Err(_) => {
                debug!(host = %self.name, "loaded mods already published, ignoring");
                false
            },
        }
    }

    /// Published loaded-mods record, empty before the loader has run.
    pub fn loaded_mods(&self) -> LoadedMods {
        self.loaded_mods.get().cloned().unwrap_or_default()
    }

    pub fn is_published(&self) -> bool {
        self.loaded_mods.get().is_some()
    }
}

impl fmt::Debug for HostModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostModule")
            .field("name", &self.name)
            .field("loaded_mods", &self.loaded_mods.get())
            .finish_non_exhaustive()
    }
}
