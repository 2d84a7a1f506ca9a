//! Import resolution ahead of the module registry.
//!
//! An [`ImportResolver`] asks its finders in order whether they can satisfy a
//! name. [`HostShim`] answers for the host's reserved name with the running
//! [`HostModule`] itself, so a mod asking for the host gets the live instance
//! instead of a second copy. It is installed at the front of the chain so no
//! other finder can shadow it.

use std::{fmt, sync::Arc};

use crate::{error::Result, host::HostModule, registry::LoadedModule};

/// What a finder reports for a name it can satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub origin: String,
}

/// A resolved import.
#[derive(Debug, Clone)]
pub enum Module {
    Host(Arc<HostModule>),
    Mod(Arc<LoadedModule>),
}

impl Module {
    pub fn as_host(&self) -> Option<&Arc<HostModule>> {
        match self {
            Self::Host(host) => Some(host),
            Self::Mod(_) => None,
        }
    }

    pub fn as_mod(&self) -> Option<&Arc<LoadedModule>> {
        match self {
            Self::Mod(module) => Some(module),
            Self::Host(_) => None,
        }
    }
}

/// One link in the resolver chain.
pub trait ModuleFinder: Send + Sync {
    /// `Some` when this finder handles `name`.
    fn find_spec(&self, name: &str) -> Option<ModuleSpec>;

    /// Produce the module for a spec this finder returned.
    fn create_module(&self, spec: &ModuleSpec) -> Module;

    /// Initialize a module produced by [`create_module`](Self::create_module).
    fn exec_module(&self, module: &Module) -> Result<()>;
}

/// Resolves exactly one reserved name to the running host.
pub struct HostShim {
    reserved: String,
    host: Arc<HostModule>,
}

impl HostShim {
    /// Shim answering for the host's own name.
    pub fn new(host: Arc<HostModule>) -> Self {
        Self {
            reserved: host.name().to_string(),
            host,
        }
    }

    /// Shim answering for an alternate name.
    pub fn with_name(reserved: impl Into<String>, host: Arc<HostModule>) -> Self {
        Self {
            reserved: reserved.into(),
            host,
        }
    }

    pub fn reserved(&self) -> &str {
        &self.reserved
    }
}

impl ModuleFinder for HostShim {
    fn find_spec(&self, name: &str) -> Option<ModuleSpec> {
        (name == self.reserved).then(|| ModuleSpec {
            name: name.to_string(),
            origin: self.reserved.clone(),
        })
    }

    fn create_module(&self, _spec: &ModuleSpec) -> Module {
        Module::Host(Arc::clone(&self.host))
    }

    fn exec_module(&self, _module: &Module) -> Result<()> {
        // The host is already running.
        Ok(())
    }
}

impl fmt::Debug for HostShim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostShim")
            .field("reserved", &self.reserved)
            .finish_non_exhaustive()
    }
}

/// Ordered chain of finders.
#[derive(Default)]
pub struct ImportResolver {
    finders: Vec<Box<dyn ModuleFinder>>,
}

impl ImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `finder` ahead of every finder already present.
    pub fn install_front(&mut self, finder: impl ModuleFinder + 'static) {
        self.finders.insert(0, Box::new(finder));
    }

    pub fn install_back(&mut self, finder: impl ModuleFinder + 'static) {
        self.finders.push(Box::new(finder));
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    /// Resolve `name` through the first finder that claims it.
    pub fn resolve(&self, name: &str) -> Result<Option<Module>> {
        for finder in &self.finders {
            if let Some(spec) = finder.find_spec(name) {
                let module = finder.create_module(&spec);
                finder.exec_module(&module)?;
                return Ok(Some(module));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for ImportResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportResolver")
            .field("finders", &self.finders.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::{descriptor::ModDescriptor, error::Error, registry::ModExports},
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    /// Claims one name with a fixed mod and counts executions.
    struct CountingFinder {
        name: &'static str,
        module: Arc<LoadedModule>,
        execs: Arc<AtomicUsize>,
    }

    impl CountingFinder {
        fn new(name: &'static str, execs: Arc<AtomicUsize>) -> Self {
            Self {
                name,
                module: Arc::new(LoadedModule::new(
                    ModDescriptor::new(name, format!("elsewhere/{name}")),
                    ModExports::new(),
                )),
                execs,
            }
        }
    }

    impl ModuleFinder for CountingFinder {
        fn find_spec(&self, name: &str) -> Option<ModuleSpec> {
            (name == self.name).then(|| ModuleSpec {
                name: name.into(),
                origin: "counting".into(),
            })
        }

        fn create_module(&self, _spec: &ModuleSpec) -> Module {
            Module::Mod(Arc::clone(&self.module))
        }

        fn exec_module(&self, _module: &Module) -> Result<()> {
            self.execs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingFinder;

    impl ModuleFinder for FailingFinder {
        fn find_spec(&self, name: &str) -> Option<ModuleSpec> {
            Some(ModuleSpec {
                name: name.into(),
                origin: "failing".into(),
            })
        }

        fn create_module(&self, _spec: &ModuleSpec) -> Module {
            Module::Host(Arc::new(HostModule::new("failing", ())))
        }

        fn exec_module(&self, _module: &Module) -> Result<()> {
            Err(Error::message("boom"))
        }
    }

    #[test]
    fn shim_matches_only_its_exact_name() {
        let host = Arc::new(HostModule::new("RiftWizard", ()));
        let shim = HostShim::new(Arc::clone(&host));
        assert!(shim.find_spec("RiftWizard").is_some());
        assert!(shim.find_spec("riftwizard").is_none());
        assert!(shim.find_spec("RiftWizard.sub").is_none());
        assert!(shim.find_spec("mods.fireball.fireball").is_none());
    }

    #[test]
    fn shim_returns_the_existing_host() {
        let host = Arc::new(HostModule::new("host", 42_u32));
        let mut resolver = ImportResolver::new();
        resolver.install_front(HostShim::new(Arc::clone(&host)));

        let module = resolver.resolve("host").unwrap().unwrap();
        let resolved = module.as_host().unwrap();
        assert!(Arc::ptr_eq(resolved, &host));
        assert_eq!(resolved.state::<u32>(), Some(&42));
    }

    #[test]
    fn front_install_shadows_existing_finders() {
        let host = Arc::new(HostModule::new("host", ()));
        let execs = Arc::new(AtomicUsize::new(0));
        let mut resolver = ImportResolver::new();
        resolver.install_back(CountingFinder::new("host", Arc::clone(&execs)));
        resolver.install_front(HostShim::new(Arc::clone(&host)));

        let module = resolver.resolve("host").unwrap().unwrap();
        assert!(module.as_host().is_some());
        assert_eq!(execs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn other_names_pass_through_to_later_finders() {
        let host = Arc::new(HostModule::new("host", ()));
        let execs = Arc::new(AtomicUsize::new(0));
        let mut resolver = ImportResolver::new();
        resolver.install_back(CountingFinder::new("lib", Arc::clone(&execs)));
        resolver.install_front(HostShim::new(host));

        let module = resolver.resolve("lib").unwrap().unwrap();
        assert!(module.as_mod().is_some());
        assert_eq!(execs.load(Ordering::SeqCst), 1);
        assert!(resolver.resolve("nothing").unwrap().is_none());
    }

    #[test]
    fn exec_failure_propagates() {
        let mut resolver = ImportResolver::new();
        resolver.install_back(FailingFinder);
        assert!(resolver.resolve("anything").is_err());
    }
}
