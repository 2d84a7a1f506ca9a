use std::{collections::HashMap, sync::Arc};

use serde_json::{Map, Value};

use crate::descriptor::ModDescriptor;

/// Names a mod's entry point exported when it ran.
pub type ModExports = Map<String, Value>;

/// A mod whose entry point has run.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    descriptor: ModDescriptor,
    exports: ModExports,
}

impl LoadedModule {
    pub fn new(descriptor: ModDescriptor, exports: ModExports) -> Self {
        Self {
            descriptor,
            exports,
        }
    }

    pub fn descriptor(&self) -> &ModDescriptor {
        &self.descriptor
    }

    pub fn module_path(&self) -> &str {
        self.descriptor.module_path()
    }

    pub fn exports(&self) -> &ModExports {
        &self.exports
    }

    pub fn export(&self, key: &str) -> Option<&Value> {
        self.exports.get(key)
    }
}

/// Modules imported so far, keyed by module path.
///
/// The orchestrator consults this before running an entry point; a module path
/// that is already present is never run again.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<LoadedModule>>,
    order: Vec<String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, module_path: &str) -> bool {
        self.modules.contains_key(module_path)
    }

    pub fn get(&self, module_path: &str) -> Option<Arc<LoadedModule>> {
        self.modules.get(module_path).cloned()
    }

    /// Register `module` unless its module path is taken. Returns the module
    /// now registered under that path.
    pub fn insert(&mut self, module: LoadedModule) -> Arc<LoadedModule> {
        let key = module.module_path().to_string();
        if let Some(existing) = self.modules.get(&key) {
            return Arc::clone(existing);
        }
        let module = Arc::new(module);
        self.order.push(key.clone());
        self.modules.insert(key, Arc::clone(&module));
        module
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Module paths in the order they were imported.
    pub fn module_paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
