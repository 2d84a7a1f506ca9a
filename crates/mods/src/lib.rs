//! Mod discovery and loading.
//!
//! A mod is a directory `<name>/` holding an entry file `<name>.<ext>`. Mods
//! are found in the host's base mods directory and, when the sideload flag is
//! passed, in the `mods/` folder of every package under an external root.
//! Each mod is imported once under the module path `mods.<name>.<name>`; the
//! first mod discovered for a module path wins and later duplicates are only
//! reported.
//!
//! Mod code never reaches the host by re-running it. The loader hands every
//! entry point a [`ModContext`] through which the already-running
//! [`HostModule`] is resolved by its reserved name.

pub mod audit;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod index;
pub mod loaded;
pub mod loader;
pub mod orchestrator;
pub mod registry;
pub mod runtime;
pub mod scanner;
pub mod search_path;
pub mod shim;
pub mod sideload;

pub use {
    audit::{DuplicateGroup, audit},
    context::ModContext,
    descriptor::{DiscoveryCollection, ModDescriptor, module_path_for},
    error::{Error, Result},
    host::HostModule,
    index::{AssetLoader, ModIndex},
    loaded::{LoadedMods, LoadedModsBuilder},
    loader::{LoadReport, LoaderSettings, ModLoader},
    orchestrator::Orchestrator,
    registry::{LoadedModule, ModExports, ModuleRegistry},
    runtime::{CommandRuntime, ModEntry, ModRuntime, StaticRuntime},
    scanner::{Discover, ModScanner, discover},
    search_path::ModuleSearchPath,
    shim::{HostShim, ImportResolver, Module, ModuleFinder, ModuleSpec},
    sideload::SideloadRequest,
};
