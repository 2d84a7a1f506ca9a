//! Configuration loading, validation, and env substitution for the mod host.
//!
//! Config files: `modhost.toml`, `modhost.yaml`, or `modhost.json`
//! Searched in `./` then `~/.config/modhost/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{HostConfig, ModhostConfig, ModsConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
