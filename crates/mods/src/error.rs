use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::descriptor::ModDescriptor;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The sideload flag was the last argument.
    #[error("\"{flag}\" must be followed by a sideload directory")]
    MissingSideloadPath { flag: String },

    /// The base mods directory is missing or not a directory.
    #[error("failed to read mods directory {path}: {source}")]
    ModsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read sideload root {path}: {source}")]
    SideloadRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mod's entry point failed while being imported.
    #[error("mod '{name}' ({module_path}) failed to load: {source}")]
    ModExecution {
        name: String,
        module_path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("no module named '{name}'")]
    ImportNotFound { name: String },

    #[error("mod '{name}' is not active")]
    UnknownMod { name: String },

    #[error("no interpreter configured for .{extension} entry files")]
    NoInterpreter { extension: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn mods_dir(path: &Path, source: std::io::Error) -> Self {
        Self::ModsDir {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn sideload_root(path: &Path, source: std::io::Error) -> Self {
        Self::SideloadRoot {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn mod_execution(descriptor: &ModDescriptor, source: anyhow::Error) -> Self {
        Self::ModExecution {
            name: descriptor.name().to_string(),
            module_path: descriptor.module_path().to_string(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn import_not_found(name: impl Into<String>) -> Self {
        Self::ImportNotFound { name: name.into() }
    }

    #[must_use]
    pub fn unknown_mod(name: impl Into<String>) -> Self {
        Self::UnknownMod { name: name.into() }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
